//! # Custom Type Registry
//!
//! Passive storage mapping an exact [`TypeDescriptor`] to a custom
//! validator. The registry never validates anything itself; the
//! [`TypeChecker`](crate::types::TypeChecker) consults it before applying
//! any structural rule.
//!
//! Lookup is exact. Registering a validator for `int` has no effect on
//! `int | None`, `list[int]` or a custom `UserId` type.
//!
//! The registry is an ordinary owned value: mutation takes `&mut self` and
//! reads take `&self`, so the borrow checker serializes mutation against
//! reads. Share it across threads behind a lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::error::BoxError;
use crate::value::Value;

/// A custom validator.
///
/// Returns `Ok(())` when the value conforms. A returned
/// [`TypeValidationError`](crate::error::TypeValidationError) is propagated
/// unchanged by the checker; any other error is wrapped into one.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), BoxError> + Send + Sync>;

/// Mapping from exact descriptor to custom validator.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    validators: HashMap<TypeDescriptor, Validator>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` for `descriptor`, replacing and returning any
    /// previous entry. The validator is not exercised at registration time.
    pub fn register<F>(&mut self, descriptor: TypeDescriptor, validator: F) -> Option<Validator>
    where
        F: Fn(&Value) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.register_shared(descriptor, Arc::new(validator))
    }

    /// Register an already shared validator.
    pub fn register_shared(
        &mut self,
        descriptor: TypeDescriptor,
        validator: Validator,
    ) -> Option<Validator> {
        let previous = self.validators.insert(descriptor.clone(), validator);
        if previous.is_some() {
            tracing::debug!(%descriptor, "replaced custom type validator");
        } else {
            tracing::debug!(%descriptor, "registered custom type validator");
        }
        previous
    }

    /// Remove the validator for `descriptor`. Idempotent.
    pub fn unregister(&mut self, descriptor: &TypeDescriptor) -> Option<Validator> {
        let removed = self.validators.remove(descriptor);
        if removed.is_some() {
            tracing::debug!(%descriptor, "unregistered custom type validator");
        }
        removed
    }

    /// The validator registered for exactly `descriptor`.
    pub fn get(&self, descriptor: &TypeDescriptor) -> Option<&Validator> {
        self.validators.get(descriptor)
    }

    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.validators.contains_key(descriptor)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Remove every validator. Intended for test isolation.
    pub fn clear(&mut self) {
        tracing::debug!(removed = self.validators.len(), "cleared custom type registry");
        self.validators.clear();
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("descriptors", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
