//! # Process-Wide Registries
//!
//! One [`TypeRegistry`] and one [`CoercionRegistry`] shared by the whole
//! process, each behind a `parking_lot::RwLock`. Applications configure them
//! at startup (or in test setup) and read them afterwards.
//!
//! ## Locking
//!
//! - Mutations take the write lock for the duration of a map operation.
//! - Type checking runs under a recursive read lock, so a custom validator
//!   may itself call [`validate_type`]. Record validation through
//!   [`Validate`](crate::Validate) holds the same lock while the field rules
//!   run. Neither a validator nor a rule may register, unregister or clear
//!   types; that would deadlock.
//! - [`coerce`] clones the coercer out of the registry and releases the
//!   lock before calling it.

use std::sync::OnceLock;

use parking_lot::RwLock;

use cascade_core::coercion::run_coercer;
use cascade_core::{
    BoxError, CascadeError, Coercer, CoercionEngine, CoercionError, CoercionRegistry,
    TypeChecker, TypeDescriptor, TypeRegistry, TypeValidationError, Validator, Value,
};

fn types() -> &'static RwLock<TypeRegistry> {
    static TYPES: OnceLock<RwLock<TypeRegistry>> = OnceLock::new();
    TYPES.get_or_init(|| RwLock::new(TypeRegistry::new()))
}

fn coercers() -> &'static RwLock<CoercionRegistry> {
    static COERCERS: OnceLock<RwLock<CoercionRegistry>> = OnceLock::new();
    COERCERS.get_or_init(|| RwLock::new(CoercionRegistry::new()))
}

// -- Types --------------------------------------------------------------------

/// Register a validator for `descriptor`, returning the one it replaces.
pub fn register_type<F>(descriptor: TypeDescriptor, validator: F) -> Option<Validator>
where
    F: Fn(&Value) -> Result<(), BoxError> + Send + Sync + 'static,
{
    types().write().register(descriptor, validator)
}

/// Remove the validator for `descriptor`. Removing an absent entry is a
/// no-op.
pub fn unregister_type(descriptor: &TypeDescriptor) -> Option<Validator> {
    types().write().unregister(descriptor)
}

pub fn get_registered_validator(descriptor: &TypeDescriptor) -> Option<Validator> {
    types().read().get(descriptor).cloned()
}

pub fn clear_registry() {
    types().write().clear();
}

/// Check `value` against `expected` using the process-wide registry.
pub fn validate_type(value: &Value, expected: &TypeDescriptor) -> Result<(), TypeValidationError> {
    with_type_checker(|checker| checker.validate_type(value, expected))
}

pub fn is_instance(value: &Value, expected: &TypeDescriptor) -> bool {
    with_type_checker(|checker| checker.is_instance(value, expected))
}

/// Run `f` with a checker over the process-wide registry.
pub fn with_type_checker<T>(f: impl FnOnce(TypeChecker<'_>) -> T) -> T {
    let registry = types().read_recursive();
    f(TypeChecker::new(&registry))
}

// -- Coercion -----------------------------------------------------------------

/// Register a coercer for `target`, returning the one it replaces.
pub fn register_coercer<F>(target: TypeDescriptor, coercer: F) -> Option<Coercer>
where
    F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    coercers().write().register(target, coercer)
}

/// Remove the coercer for `target`. Removing an absent entry is a no-op.
pub fn unregister_coercer(target: &TypeDescriptor) -> Option<Coercer> {
    coercers().write().unregister(target)
}

pub fn get_registered_coercer(target: &TypeDescriptor) -> Option<Coercer> {
    coercers().read().get(target).cloned()
}

pub fn clear_coercers() {
    coercers().write().clear();
}

/// Register the standard `int`, `float`, `str` and `bool` conversions.
pub fn register_builtin_coercers() {
    coercers().write().register_builtins();
}

/// Whether a coercer is registered for `target`. `value` is not inspected.
pub fn can_coerce(value: &Value, target: &TypeDescriptor) -> bool {
    with_coercion_engine(|engine| engine.can_coerce(value, target))
}

/// Convert `value` with the process-wide coercer for `target`.
pub fn coerce(value: &Value, target: &TypeDescriptor) -> Result<Value, CascadeError> {
    let coercer = get_registered_coercer(target)
        .ok_or_else(|| CoercionError::no_coercer(value.clone(), target.clone()))?;
    run_coercer(&coercer, value, target)
}

/// Run `f` with an engine over the process-wide coercion registry.
///
/// Coercers invoked through the engine run with the read lock held.
pub fn with_coercion_engine<T>(f: impl FnOnce(CoercionEngine<'_>) -> T) -> T {
    let registry = coercers().read_recursive();
    f(CoercionEngine::new(&registry))
}
