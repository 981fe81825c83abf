//! # Records
//!
//! [`Record`] is the seam between validation and whatever holds field
//! values. A typed struct implements it by returning a shared schema and
//! converting its fields to [`Value`]s; [`DynamicRecord`] implements it over
//! a schema loaded at runtime.
//!
//! Nothing here validates. Construction and [`DynamicRecord::set`] only
//! store values; validation happens when a caller asks for it.

use std::sync::Arc;

use cascade_core::Value;

use crate::error::RecordError;
use crate::schema::RecordSchema;

/// A value holder that can be validated against its schema.
pub trait Record {
    fn schema(&self) -> &RecordSchema;

    /// Current value of a declared field. A declared field that holds no
    /// value reads as `None` from the orchestrator's point of view.
    fn field_value(&self, name: &str) -> Option<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn schema(&self) -> &RecordSchema {
        (**self).schema()
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        (**self).field_value(name)
    }
}

/// A record whose shape comes from a [`RecordSchema`] at runtime.
#[derive(Clone, Debug)]
pub struct DynamicRecord {
    schema: Arc<RecordSchema>,
    /// Parallel to `schema.fields()`.
    values: Vec<Value>,
}

impl DynamicRecord {
    /// Build a record from named values, filling defaults for the rest.
    pub fn new<K, I>(schema: Arc<RecordSchema>, values: I) -> Result<Self, RecordError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut slots: Vec<Option<Value>> = vec![None; schema.fields().len()];
        for (name, value) in values {
            let name = name.as_ref();
            let index = schema.position(name).ok_or_else(|| RecordError::UnknownField {
                record: schema.name().to_owned(),
                field: name.to_owned(),
            })?;
            slots[index] = Some(value);
        }

        let values = schema
            .fields()
            .iter()
            .zip(slots)
            .map(|(field, slot)| match (slot, field.default()) {
                (Some(value), _) => Ok(value),
                (None, Some(default)) => Ok(default.produce()),
                (None, None) => Err(RecordError::MissingField {
                    record: schema.name().to_owned(),
                    field: field.name().to_owned(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { schema, values })
    }

    /// Build a record from a JSON object keyed by field name.
    pub fn from_json(
        schema: Arc<RecordSchema>,
        json: serde_json::Value,
    ) -> Result<Self, RecordError> {
        match json {
            serde_json::Value::Object(map) => {
                Self::new(schema, map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
            _ => Err(RecordError::NotAnObject {
                record: schema.name().to_owned(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|i| &self.values[i])
    }

    /// Replace a field's value. The new value is not validated.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value, RecordError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| RecordError::UnknownField {
                record: self.schema.name().to_owned(),
                field: name.to_owned(),
            })?;
        Ok(std::mem::replace(&mut self.values[index], value.into()))
    }

    pub fn shared_schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }
}

impl Record for DynamicRecord {
    fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}
