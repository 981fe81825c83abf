//! # Coercion
//!
//! On-demand conversion of values toward a target descriptor through
//! caller-registered coercers. Coercion is a separate facility: the type
//! checker never invokes it.
//!
//! [`CoercionEngine::coerce`] has three outcomes besides success:
//!
//! - no coercer registered for the target: [`CoercionError`] (`NoCoercer`);
//! - the coercer itself fails: [`CascadeError::CoercerFailed`] carrying the
//!   coercer's own error as `source`, not a `CoercionError`;
//! - the coercer returns a value the target does not admit: [`CoercionError`]
//!   (`ResultTypeMismatch`).
//!
//! The result check is the shallow membership of
//! [`TypeDescriptor::admits`]: containers only check their outer kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::error::{BoxError, CascadeError, CoercionError};
use crate::value::Value;

/// A conversion toward the descriptor it is registered under.
pub type Coercer = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

/// Mapping from exact target descriptor to coercer.
///
/// Independent of [`TypeRegistry`](crate::registry::TypeRegistry): the same
/// descriptor may key a validator and a coercer without interaction.
#[derive(Default, Clone)]
pub struct CoercionRegistry {
    coercers: HashMap<TypeDescriptor, Coercer>,
}

impl CoercionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `coercer` for `target`, replacing and returning any previous
    /// entry.
    pub fn register<F>(&mut self, target: TypeDescriptor, coercer: F) -> Option<Coercer>
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.register_shared(target, Arc::new(coercer))
    }

    /// Register an already shared coercer.
    pub fn register_shared(&mut self, target: TypeDescriptor, coercer: Coercer) -> Option<Coercer> {
        let previous = self.coercers.insert(target.clone(), coercer);
        if previous.is_some() {
            tracing::debug!(%target, "replaced coercer");
        } else {
            tracing::debug!(%target, "registered coercer");
        }
        previous
    }

    /// Remove the coercer for `target`. Idempotent.
    pub fn unregister(&mut self, target: &TypeDescriptor) -> Option<Coercer> {
        let removed = self.coercers.remove(target);
        if removed.is_some() {
            tracing::debug!(%target, "unregistered coercer");
        }
        removed
    }

    pub fn get(&self, target: &TypeDescriptor) -> Option<&Coercer> {
        self.coercers.get(target)
    }

    pub fn contains(&self, target: &TypeDescriptor) -> bool {
        self.coercers.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.coercers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coercers.is_empty()
    }

    /// Remove every coercer. Intended for test isolation.
    pub fn clear(&mut self) {
        tracing::debug!(removed = self.coercers.len(), "cleared coercion registry");
        self.coercers.clear();
    }

    /// Install the [`builtin`] coercers for `int`, `float`, `str` and
    /// `bool`, replacing whatever is registered for those targets.
    pub fn register_builtins(&mut self) {
        self.register(TypeDescriptor::INT, builtin::to_int);
        self.register(TypeDescriptor::FLOAT, builtin::to_float);
        self.register(TypeDescriptor::STR, builtin::to_str);
        self.register(TypeDescriptor::BOOL, builtin::to_bool);
    }
}

impl fmt::Debug for CoercionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoercionRegistry")
            .field("targets", &self.coercers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `can_coerce` / `coerce` over a borrowed [`CoercionRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct CoercionEngine<'r> {
    registry: &'r CoercionRegistry,
}

impl<'r> CoercionEngine<'r> {
    pub fn new(registry: &'r CoercionRegistry) -> Self {
        Self { registry }
    }

    /// Whether a coercer is registered for `target`.
    ///
    /// Only checks registration: `value` is not inspected and no
    /// conversion is attempted.
    pub fn can_coerce(&self, _value: &Value, target: &TypeDescriptor) -> bool {
        self.registry.contains(target)
    }

    /// Convert `value` with the coercer registered for `target` and verify
    /// the result is a member of `target`.
    pub fn coerce(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, CascadeError> {
        let coercer = self
            .registry
            .get(target)
            .ok_or_else(|| CoercionError::no_coercer(value.clone(), target.clone()))?;
        run_coercer(coercer, value, target)
    }
}

/// Invoke `coercer` and verify its result against `target`.
///
/// Exposed so that callers holding a cloned [`Coercer`] can run it without
/// keeping the registry borrowed.
pub fn run_coercer(
    coercer: &Coercer,
    value: &Value,
    target: &TypeDescriptor,
) -> Result<Value, CascadeError> {
    let converted = coercer(value).map_err(|source| {
        tracing::debug!(%target, error = %source, "coercer failed");
        CascadeError::CoercerFailed {
            value: value.clone(),
            target: target.clone(),
            source,
        }
    })?;

    if !target.admits(&converted) {
        tracing::debug!(%target, result = %converted, "coercer returned a non-member");
        return Err(CoercionError::result_type_mismatch(value.clone(), target.clone(), converted).into());
    }
    Ok(converted)
}

/// Standard conversions, opt-in through
/// [`CoercionRegistry::register_builtins`].
pub mod builtin {
    use thiserror::Error;

    use crate::error::BoxError;
    use crate::value::Value;

    /// A built-in conversion does not apply to the given value.
    #[derive(Error, Debug, Clone, PartialEq)]
    #[error("cannot convert {value} to {target}")]
    pub struct ConversionError {
        pub value: Value,
        pub target: &'static str,
    }

    fn fail<T>(value: &Value, target: &'static str) -> Result<T, BoxError> {
        Err(Box::new(ConversionError {
            value: value.clone(),
            target,
        }))
    }

    /// Ints, bools, integral finite floats and decimal strings (surrounding
    /// whitespace ignored).
    pub fn to_int(value: &Value) -> Result<Value, BoxError> {
        match value {
            Value::Int(n) => Ok(Value::Int(*n)),
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => {
                if *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                    Ok(Value::Int(*x as i64))
                } else {
                    fail(value, "int")
                }
            }
            Value::Str(s) => match s.trim().parse::<i64>() {
                Ok(n) => Ok(Value::Int(n)),
                Err(_) => fail(value, "int"),
            },
            _ => fail(value, "int"),
        }
    }

    /// Floats, ints, bools and numeric strings.
    pub fn to_float(value: &Value) -> Result<Value, BoxError> {
        match value {
            Value::Float(x) => Ok(Value::Float(*x)),
            Value::Int(n) => Ok(Value::Float(*n as f64)),
            Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Str(s) => match s.trim().parse::<f64>() {
                Ok(x) => Ok(Value::Float(x)),
                Err(_) => fail(value, "float"),
            },
            _ => fail(value, "float"),
        }
    }

    /// Strings unchanged; scalars through their display form.
    pub fn to_str(value: &Value) -> Result<Value, BoxError> {
        match value {
            Value::Str(s) => Ok(Value::Str(s.clone())),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::None => {
                Ok(Value::Str(value.to_string()))
            }
            _ => fail(value, "str"),
        }
    }

    /// Bools, the ints 0 and 1, and the usual spellings of true and false.
    pub fn to_bool(value: &Value) -> Result<Value, BoxError> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Int(0) => Ok(Value::Bool(false)),
            Value::Int(1) => Ok(Value::Bool(true)),
            Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => fail(value, "bool"),
            },
            _ => fail(value, "bool"),
        }
    }
}
