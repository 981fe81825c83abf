//! # cascade — Runtime Value Validation
//!
//! Explicit, fail-fast validation of dynamic values against type
//! descriptors, opt-in coercion, and field-level rules for records.
//!
//! This crate ties the workspace together:
//!
//! - [`api`]: process-wide type and coercion registries with free
//!   functions (`register_type`, `validate_type`, `coerce`, ...).
//! - [`Validate`]: `validate()`, `validate_field()` and `is_valid()` on
//!   every [`Record`], checked against the process-wide registry.
//! - Re-exports of the value model, descriptors, errors, rules and record
//!   schemas from `cascade-core`, `cascade-rules` and `cascade-record`.
//!
//! Code that wants isolated registries (tests, multi-tenant hosts) can use
//! [`TypeChecker`] and [`CoercionEngine`] over owned registries directly.

pub mod api;
pub mod validate;

pub use validate::Validate;

pub use cascade_core::{
    coercion, BoxError, CascadeError, Coercer, CoercionEngine, CoercionError, CoercionErrorKind,
    CoercionRegistry, ContainerKind, CustomValue, DescriptorParseError, PrimitiveType,
    RuleValidationError, TypeChecker, TypeDescriptor, TypeName, TypeRegistry,
    TypeValidationError, ValidationError, Validator, Value, ValueKind,
};
pub use cascade_record::{
    DynamicRecord, Field, FieldDefault, Record, RecordError, RecordSchema, RecordSchemaBuilder,
    SchemaError, SchemaLoadError, ValidationOrchestrator,
};
pub use cascade_rules::{
    predicate, rule_fn, FnRule, Max, MaxLength, Min, MinLength, OneOf, Pattern, Rule, RuleSpec,
    RuleSpecError,
};
