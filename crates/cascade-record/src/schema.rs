//! # Record Schemas
//!
//! A [`RecordSchema`] is the declaration of a record type: its name and its
//! fields in declaration order. Field order is validation order.
//!
//! Schemas are built in code with [`RecordSchema::builder`] or loaded from a
//! YAML/JSON document:
//!
//! ```yaml
//! name: User
//! fields:
//!   - name: id
//!     type: int
//!   - name: age
//!     type: int
//!     rules:
//!       - { rule: min, value: 18 }
//!   - name: nickname
//!     type: str | None
//!     default: null
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer};

use cascade_core::{TypeDescriptor, Value};
use cascade_rules::RuleSpec;

use crate::error::{SchemaError, SchemaLoadError};
use crate::field::Field;

/// The declaration of a record type.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    name: String,
    fields: Vec<Field>,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Position of a field in declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Parse a YAML schema document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaLoadError> {
        let document: SchemaDocument = serde_yaml::from_str(text)?;
        document.into_schema()
    }

    /// Parse a JSON schema document.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        let document: SchemaDocument = serde_json::from_str(text)?;
        document.into_schema()
    }

    /// Load a schema file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, SchemaLoadError> = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(SchemaLoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let text = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = parse(&text)?;
        tracing::debug!(
            record = schema.name(),
            fields = schema.fields().len(),
            path = %path.display(),
            "loaded record schema"
        );
        Ok(schema)
    }
}

/// Collects fields, then checks the declaration as a whole.
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl RecordSchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the declaration, rejecting duplicate field names.
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name() == field.name()) {
                return Err(SchemaError::DuplicateField {
                    record: self.name,
                    field: field.name().to_owned(),
                });
            }
        }
        Ok(RecordSchema {
            name: self.name,
            fields: self.fields,
        })
    }
}

#[derive(Deserialize)]
struct SchemaDocument {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Deserialize)]
struct FieldDocument {
    name: String,
    #[serde(default, rename = "type")]
    ty: Option<TypeDescriptor>,
    #[serde(default)]
    rules: Vec<RuleSpec>,
    /// `Some(Null)` for an explicit `default: null`, `None` when absent.
    #[serde(default, deserialize_with = "present")]
    default: Option<serde_json::Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl SchemaDocument {
    fn into_schema(self) -> Result<RecordSchema, SchemaLoadError> {
        let mut builder = RecordSchema::builder(self.name);
        for doc in self.fields {
            let mut field = Field::new(doc.name.clone());
            if let Some(ty) = doc.ty {
                field = field.typed(ty);
            }
            for spec in &doc.rules {
                let rule = spec.build().map_err(|source| SchemaLoadError::InvalidRule {
                    field: doc.name.clone(),
                    source,
                })?;
                field = field.shared_rule(rule);
            }
            if let Some(default) = doc.default {
                field = field.default_value(Value::from(default));
            }
            builder = builder.field(field);
        }
        Ok(builder.build()?)
    }
}
