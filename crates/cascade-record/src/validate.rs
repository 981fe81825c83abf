//! # Validation Orchestrator
//!
//! Sequences the checks for a record, field by field in declaration order:
//!
//! 1. Read the field's current value (absent reads as `None`).
//! 2. If the field declares a type, run the type checker. A type failure
//!    stops here; rules never see a value of the wrong shape.
//! 3. Run the field's rules in declaration order, stopping at the first
//!    violation.
//!
//! The first failure anywhere in the record is returned. Nothing is
//! aggregated and nothing is retried.

use cascade_core::{CascadeError, TypeChecker, ValidationError, Value};

use crate::field::Field;
use crate::record::Record;

/// Runs type checks then rules over a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct ValidationOrchestrator<'r> {
    checker: TypeChecker<'r>,
}

impl<'r> ValidationOrchestrator<'r> {
    pub fn new(checker: TypeChecker<'r>) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> TypeChecker<'r> {
        self.checker
    }

    /// Validate every field in declaration order.
    pub fn validate<R: Record + ?Sized>(&self, record: &R) -> Result<(), ValidationError> {
        let schema = record.schema();
        for field in schema.fields() {
            if let Err(err) = self.check_field(record, field) {
                tracing::debug!(
                    record = schema.name(),
                    field = field.name(),
                    error = %err,
                    "record validation failed"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Validate a single named field.
    pub fn validate_field<R: Record + ?Sized>(
        &self,
        record: &R,
        name: &str,
    ) -> Result<(), CascadeError> {
        let schema = record.schema();
        let field = schema.field(name).ok_or_else(|| CascadeError::UnknownField {
            record: schema.name().to_owned(),
            field: name.to_owned(),
        })?;
        Ok(self.check_field(record, field)?)
    }

    /// `validate` as a boolean. Only validation failures become `false`.
    pub fn is_valid<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.validate(record).is_ok()
    }

    fn check_field<R: Record + ?Sized>(
        &self,
        record: &R,
        field: &Field,
    ) -> Result<(), ValidationError> {
        let value = record.field_value(field.name()).unwrap_or(Value::None);
        if let Some(ty) = field.ty() {
            self.checker.validate_type(&value, ty)?;
        }
        for rule in field.rules() {
            tracing::trace!(field = field.name(), rule = rule.name(), "running rule");
            rule.check(&value)?;
        }
        Ok(())
    }
}
