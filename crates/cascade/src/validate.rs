//! Validation methods on every [`Record`], backed by the process-wide type
//! registry.

use cascade_core::{CascadeError, ValidationError};
use cascade_record::{Record, ValidationOrchestrator};

use crate::api;

/// `validate`, `validate_field` and `is_valid` for any [`Record`].
///
/// Validation only ever happens when one of these is called.
///
/// Each call holds the process-wide type registry's read lock while the
/// type checks and the field rules run. A rule may read the registry, for
/// example through [`api::is_instance`], but calling
/// [`api::register_type`] or any other registry mutation from a rule
/// deadlocks.
pub trait Validate: Record {
    /// Validate every field in declaration order, failing at the first
    /// type or rule violation.
    fn validate(&self) -> Result<(), ValidationError> {
        api::with_type_checker(|checker| ValidationOrchestrator::new(checker).validate(self))
    }

    /// Validate one field. Unknown names fail with
    /// [`CascadeError::UnknownField`].
    fn validate_field(&self, name: &str) -> Result<(), CascadeError> {
        api::with_type_checker(|checker| {
            ValidationOrchestrator::new(checker).validate_field(self, name)
        })
    }

    fn is_valid(&self) -> bool {
        api::with_type_checker(|checker| ValidationOrchestrator::new(checker).is_valid(self))
    }
}

impl<R: Record + ?Sized> Validate for R {}
