//! # Error Taxonomy
//!
//! Callers pattern-match on these kinds to tell apart "not the right shape"
//! ([`TypeValidationError`]), "right shape, breaks a business rule"
//! ([`RuleValidationError`]) and "no converter / converter result wrong"
//! ([`CoercionError`]).
//!
//! ```text
//! CascadeError
//! ├── Validation(ValidationError)
//! │   ├── Type(TypeValidationError)
//! │   └── Rule(RuleValidationError)
//! ├── Coercion(CoercionError)
//! ├── CoercerFailed { .., source }
//! └── UnknownField { record, field }
//! ```
//!
//! `CoercionError` converts into `CascadeError` but never into
//! `ValidationError`: a failed conversion is not a failed validation.

use thiserror::Error;

use crate::descriptor::TypeDescriptor;
use crate::value::Value;

/// Error type returned by caller-supplied validators and coercers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Root error for the whole engine.
#[derive(Error, Debug)]
pub enum CascadeError {
    /// A value failed type or rule validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Coercion infrastructure failed.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// A registered coercer raised its own error. The original error is
    /// kept as `source` so callers can downcast it.
    #[error("coercer for {target} failed on {value}: {source}")]
    CoercerFailed {
        value: Value,
        target: TypeDescriptor,
        #[source]
        source: BoxError,
    },

    /// A field name that the record does not declare.
    #[error("field '{field}' does not exist on record '{record}'")]
    UnknownField { record: String, field: String },
}

impl From<TypeValidationError> for CascadeError {
    fn from(err: TypeValidationError) -> Self {
        CascadeError::Validation(err.into())
    }
}

impl From<RuleValidationError> for CascadeError {
    fn from(err: RuleValidationError) -> Self {
        CascadeError::Validation(err.into())
    }
}

impl CascadeError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CascadeError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// A value failed validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Type(#[from] TypeValidationError),

    #[error(transparent)]
    Rule(#[from] RuleValidationError),
}

impl ValidationError {
    /// The value that failed.
    pub fn value(&self) -> &Value {
        match self {
            ValidationError::Type(err) => err.value(),
            ValidationError::Rule(err) => err.value(),
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, ValidationError::Type(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, ValidationError::Rule(_))
    }
}

/// A value does not have the expected shape.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TypeValidationError {
    value: Value,
    expected: TypeDescriptor,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TypeValidationError {
    /// Mismatch with the default message.
    pub fn new(value: Value, expected: TypeDescriptor) -> Self {
        let message = format!(
            "Expected value of type {expected}, got {value} of type {}",
            value.type_name()
        );
        Self {
            value,
            expected,
            message,
            source: None,
        }
    }

    /// Mismatch with a caller-supplied message.
    pub fn with_message(value: Value, expected: TypeDescriptor, message: impl Into<String>) -> Self {
        Self {
            value,
            expected,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the error that caused this mismatch.
    pub fn caused_by(mut self, source: BoxError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The descriptor the value was checked against.
    pub fn expected(&self) -> &TypeDescriptor {
        &self.expected
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A value has the right shape but violates a named rule.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("rule '{rule_name}' failed: {message}")]
pub struct RuleValidationError {
    value: Value,
    rule_name: String,
    message: String,
}

impl RuleValidationError {
    pub fn new(value: Value, rule_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            value,
            rule_name: rule_name.into(),
            message: message.into(),
        }
    }

    /// Violation with the default message.
    pub fn violated(value: Value, rule_name: impl Into<String>) -> Self {
        let rule_name = rule_name.into();
        let message = format!("value {value} violates rule '{rule_name}'");
        Self {
            value,
            rule_name,
            message,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a coercion failed.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionErrorKind {
    /// Nothing is registered for the target.
    NoCoercer,
    /// The coercer returned a value that is not a member of the target.
    ResultTypeMismatch { actual: Value },
}

/// Coercion infrastructure failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", describe_coercion(.value, .target, .kind))]
pub struct CoercionError {
    value: Value,
    target: TypeDescriptor,
    kind: CoercionErrorKind,
}

fn describe_coercion(value: &Value, target: &TypeDescriptor, kind: &CoercionErrorKind) -> String {
    match kind {
        CoercionErrorKind::NoCoercer => {
            format!("cannot coerce {value} to {target}: no coercer registered")
        }
        CoercionErrorKind::ResultTypeMismatch { actual } => format!(
            "coercer for {target} returned {actual} of type {} when coercing {value}",
            actual.type_name()
        ),
    }
}

impl CoercionError {
    pub fn no_coercer(value: Value, target: TypeDescriptor) -> Self {
        Self {
            value,
            target,
            kind: CoercionErrorKind::NoCoercer,
        }
    }

    pub fn result_type_mismatch(value: Value, target: TypeDescriptor, actual: Value) -> Self {
        Self {
            value,
            target,
            kind: CoercionErrorKind::ResultTypeMismatch { actual },
        }
    }

    /// The value that was being coerced.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn target(&self) -> &TypeDescriptor {
        &self.target
    }

    pub fn kind(&self) -> &CoercionErrorKind {
        &self.kind
    }
}
