//! # Built-in Rules
//!
//! Numeric bounds, length bounds, regex patterns and membership. Each rule
//! fails (rather than passing silently) when handed a value of a kind it
//! cannot judge; in a record the type check runs first, so this only shows
//! up when a rule is attached to a loosely typed field.

use regex::Regex;

use cascade_core::{RuleValidationError, Value};

use crate::rule::Rule;

/// Inclusive numeric lower bound on ints and floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min {
    bound: f64,
}

impl Min {
    pub fn new(bound: impl Into<f64>) -> Self {
        Self {
            bound: bound.into(),
        }
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }
}

impl Rule for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        match value.as_f64() {
            Some(x) if x >= self.bound => Ok(()),
            Some(_) => Err(self.violation(
                value,
                format!("value {value} is less than the minimum {}", self.bound),
            )),
            None => Err(self.violation(
                value,
                format!("min requires a number, got {}", value.type_name()),
            )),
        }
    }
}

/// Inclusive numeric upper bound on ints and floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max {
    bound: f64,
}

impl Max {
    pub fn new(bound: impl Into<f64>) -> Self {
        Self {
            bound: bound.into(),
        }
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }
}

impl Rule for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        match value.as_f64() {
            Some(x) if x <= self.bound => Ok(()),
            Some(_) => Err(self.violation(
                value,
                format!("value {value} is greater than the maximum {}", self.bound),
            )),
            None => Err(self.violation(
                value,
                format!("max requires a number, got {}", value.type_name()),
            )),
        }
    }
}

/// Minimum length of a string (in chars), bytes or collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength {
    min: usize,
}

impl MinLength {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Rule for MinLength {
    fn name(&self) -> &str {
        "min_length"
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        match value.length() {
            Some(len) if len >= self.min => Ok(()),
            Some(len) => Err(self.violation(
                value,
                format!("length {len} is shorter than {}", self.min),
            )),
            None => Err(self.violation(
                value,
                format!("{} has no length", value.type_name()),
            )),
        }
    }
}

/// Maximum length of a string (in chars), bytes or collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Rule for MaxLength {
    fn name(&self) -> &str {
        "max_length"
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        match value.length() {
            Some(len) if len <= self.max => Ok(()),
            Some(len) => Err(self.violation(
                value,
                format!("length {len} is longer than {}", self.max),
            )),
            None => Err(self.violation(
                value,
                format!("{} has no length", value.type_name()),
            )),
        }
    }
}

/// A string containing a match of the regex. Anchor the pattern with
/// `^...$` to require a full match.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Rule for Pattern {
    fn name(&self) -> &str {
        "pattern"
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        match value.as_str() {
            Some(s) if self.regex.is_match(s) => Ok(()),
            Some(_) => Err(self.violation(
                value,
                format!("value {value} does not match /{}/", self.regex.as_str()),
            )),
            None => Err(self.violation(
                value,
                format!("pattern requires a str, got {}", value.type_name()),
            )),
        }
    }
}

/// Membership in a fixed set of allowed values.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    allowed: Vec<Value>,
}

impl OneOf {
    pub fn new<I, T>(allowed: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }
}

impl Rule for OneOf {
    fn name(&self) -> &str {
        "one_of"
    }

    fn check(&self, value: &Value) -> Result<(), RuleValidationError> {
        if self.allowed.contains(value) {
            return Ok(());
        }
        Err(self.violation(
            value,
            format!("value {value} is not one of {}", Value::List(self.allowed.clone())),
        ))
    }
}
