//! # cascade-rules — Named Business Rules
//!
//! Rules run after a field's type check has passed and judge whether a
//! well-shaped value is acceptable: `age >= 18`, `slug matches ^[a-z-]+$`.
//! A rule reports a violation as
//! [`RuleValidationError`](cascade_core::RuleValidationError) carrying its
//! name.
//!
//! - [`Rule`]: the capability trait; [`rule_fn`] and [`predicate`] adapt
//!   closures.
//! - [`builtin`]: `Min`, `Max`, `MinLength`, `MaxLength`, `Pattern`, `OneOf`.
//! - [`RuleSpec`]: serde description of a built-in rule for schema files.
//!
//! Depends only on `cascade-core`.

pub mod builtin;
pub mod rule;
pub mod spec;

pub use builtin::{Max, MaxLength, Min, MinLength, OneOf, Pattern};
pub use rule::{predicate, rule_fn, FnRule, Rule};
pub use spec::{RuleSpec, RuleSpecError};
