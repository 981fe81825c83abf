//! # The Rule Capability
//!
//! A rule is anything that offers a diagnostic name and a `check` that
//! fails with [`RuleValidationError`]. There is no required base type:
//! built-in rules, caller structs and plain closures (through [`rule_fn`]
//! and [`predicate`]) are all equally rules. A rule without a name cannot
//! be constructed.

use std::fmt;
use std::sync::Arc;

use cascade_core::{RuleValidationError, Value};

/// A named check on a single value.
pub trait Rule: Send + Sync {
    /// Diagnostic name carried by every violation of this rule.
    fn name(&self) -> &str;

    /// Succeed, or fail with a [`RuleValidationError`] naming this rule.
    fn check(&self, value: &Value) -> Result<(), RuleValidationError>;

    /// Build a violation of this rule.
    fn violation(&self, value: &Value, message: String) -> RuleValidationError {
        RuleValidationError::new(value.clone(), self.name(), message)
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self.name())
    }
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        (**self).check(value)
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        (**self).check(value)
    }
}

/// A closure with a name.
pub struct FnRule<F> {
    name: String,
    check: F,
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&Value) -> Result<(), RuleValidationError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        (self.check)(value)
    }
}

/// Turn a closure that reports its own violations into a rule.
pub fn rule_fn<F>(name: impl Into<String>, check: F) -> FnRule<F>
where
    F: Fn(&Value) -> Result<(), RuleValidationError> + Send + Sync,
{
    FnRule {
        name: name.into(),
        check,
    }
}

/// Turn a boolean predicate into a rule failing with `message`.
pub fn predicate<P>(
    name: impl Into<String>,
    message: impl Into<String>,
    pred: P,
) -> impl Rule
where
    P: Fn(&Value) -> bool + Send + Sync,
{
    let name = name.into();
    let message = message.into();
    let rule_name = name.clone();
    rule_fn(name, move |value: &Value| {
        if pred(value) {
            Ok(())
        } else {
            Err(RuleValidationError::new(
                value.clone(),
                rule_name.clone(),
                message.clone(),
            ))
        }
    })
}
