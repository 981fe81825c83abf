//! # Field Declarations
//!
//! A [`Field`] is plain metadata: a name, an optional declared type, the
//! rules attached to it in declaration order, and an optional default used
//! when a [`DynamicRecord`](crate::record::DynamicRecord) is built without a
//! value for it. Declaring a field never validates anything.

use std::fmt;
use std::sync::Arc;

use cascade_core::{TypeDescriptor, Value};
use cascade_rules::Rule;

/// How a missing field value is filled in at construction.
#[derive(Clone)]
pub enum FieldDefault {
    /// A fixed value, cloned for each record.
    Value(Value),
    /// A factory called once per record.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl FieldDefault {
    pub fn produce(&self) -> Value {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// A declared record field.
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    ty: Option<TypeDescriptor>,
    rules: Vec<Arc<dyn Rule>>,
    default: Option<FieldDefault>,
}

impl Field {
    /// An untyped field with no rules and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            rules: Vec::new(),
            default: None,
        }
    }

    /// Declare the field's type.
    pub fn typed(mut self, ty: TypeDescriptor) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Attach a rule after the ones already attached.
    pub fn rule<R: Rule + 'static>(self, rule: R) -> Self {
        self.shared_rule(Arc::new(rule))
    }

    /// Attach an already shared rule.
    pub fn shared_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    pub fn default_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(FieldDefault::Factory(Arc::new(factory)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Option<&TypeDescriptor> {
        self.ty.as_ref()
    }

    /// Attached rules, in execution order.
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_rules::{Max, Min};

    #[test]
    fn test_rules_keep_declaration_order() {
        let field = Field::new("age")
            .typed(TypeDescriptor::INT)
            .rule(Min::new(18))
            .rule(Max::new(130));
        let names: Vec<&str> = field.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["min", "max"]);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            Field::new("age").default_value(18).default().map(FieldDefault::produce),
            Some(Value::Int(18))
        );
        let tags = Field::new("tags").default_with(|| Value::List(Vec::new()));
        assert_eq!(tags.default().map(FieldDefault::produce), Some(Value::List(vec![])));
        assert!(Field::new("id").default().is_none());
    }

    #[test]
    fn test_untyped_field() {
        assert!(Field::new("note").ty().is_none());
    }
}
