//! # Type Checking
//!
//! [`TypeChecker::validate_type`] decides whether a [`Value`] conforms to a
//! [`TypeDescriptor`], recursively, and reports the first mismatch as a
//! [`TypeValidationError`]. It never coerces and never evaluates rules.
//!
//! ## Dispatch Order
//!
//! 1. `Any` always succeeds.
//! 2. A validator registered for exactly this descriptor replaces every
//!    structural rule below, including for primitive and container
//!    descriptors.
//! 3. Primitive and custom descriptors: exact-kind membership.
//! 4. Unions: alternatives in declared order, first success wins. If none
//!    matches, the error names the whole union.
//! 5. Containers: outer kind first. Then, with one element descriptor on a
//!    sequence or set, every element; with two on a mapping, every key and
//!    value. Any other arity only checks the outer kind.
//!
//! Checking stops at the first mismatch.

use crate::descriptor::{ContainerKind, TypeDescriptor};
use crate::error::TypeValidationError;
use crate::registry::{TypeRegistry, Validator};
use crate::value::Value;

/// Recursive type checker over a borrowed [`TypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> TypeChecker<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// The registry consulted for custom validators.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Check `value` against `expected`, failing with the first mismatch.
    pub fn validate_type(
        &self,
        value: &Value,
        expected: &TypeDescriptor,
    ) -> Result<(), TypeValidationError> {
        self.check(value, expected)
    }

    /// Boolean form of [`validate_type`](Self::validate_type).
    pub fn is_instance(&self, value: &Value, expected: &TypeDescriptor) -> bool {
        self.check(value, expected).is_ok()
    }

    fn check(&self, value: &Value, expected: &TypeDescriptor) -> Result<(), TypeValidationError> {
        if expected.is_any() {
            return Ok(());
        }

        if let Some(validator) = self.registry.get(expected) {
            return check_custom(value, expected, validator);
        }

        match expected {
            TypeDescriptor::Any => Ok(()),
            TypeDescriptor::Primitive(_) | TypeDescriptor::Custom(_) => {
                check_plain(value, expected)
            }
            TypeDescriptor::Union(alternatives) => self.check_union(value, expected, alternatives),
            TypeDescriptor::Container { kind, params } => {
                self.check_container(value, expected, *kind, params)
            }
        }
    }

    fn check_union(
        &self,
        value: &Value,
        expected: &TypeDescriptor,
        alternatives: &[TypeDescriptor],
    ) -> Result<(), TypeValidationError> {
        if alternatives.iter().any(|option| self.check(value, option).is_ok()) {
            return Ok(());
        }
        Err(TypeValidationError::new(value.clone(), expected.clone()))
    }

    fn check_container(
        &self,
        value: &Value,
        expected: &TypeDescriptor,
        kind: ContainerKind,
        params: &[TypeDescriptor],
    ) -> Result<(), TypeValidationError> {
        if !kind.admits(value) {
            return Err(TypeValidationError::new(value.clone(), expected.clone()));
        }

        match (params, value) {
            ([], _) => Ok(()),
            ([item_type], Value::List(items) | Value::Tuple(items) | Value::Set(items))
                if kind.is_sequence_like() =>
            {
                items.iter().try_for_each(|item| self.check(item, item_type))
            }
            ([key_type, value_type], Value::Map(entries)) if kind.is_mapping_like() => {
                entries.iter().try_for_each(|(key, entry)| {
                    self.check(key, key_type)?;
                    self.check(entry, value_type)
                })
            }
            _ => {
                tracing::trace!(
                    descriptor = %expected,
                    arity = params.len(),
                    "unsupported parameterization, checked outer kind only"
                );
                Ok(())
            }
        }
    }
}

fn check_plain(value: &Value, expected: &TypeDescriptor) -> Result<(), TypeValidationError> {
    if expected.admits(value) {
        Ok(())
    } else {
        Err(TypeValidationError::new(value.clone(), expected.clone()))
    }
}

fn check_custom(
    value: &Value,
    expected: &TypeDescriptor,
    validator: &Validator,
) -> Result<(), TypeValidationError> {
    tracing::trace!(descriptor = %expected, "dispatching to custom validator");
    let Err(err) = validator(value) else {
        return Ok(());
    };
    match err.downcast::<TypeValidationError>() {
        Ok(type_err) => Err(*type_err),
        Err(other) => {
            tracing::debug!(
                descriptor = %expected,
                error = %other,
                "wrapping custom validator failure"
            );
            Err(
                TypeValidationError::with_message(value.clone(), expected.clone(), other.to_string())
                    .caused_by(other),
            )
        }
    }
}
