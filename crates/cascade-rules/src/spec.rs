//! # Rule Descriptions
//!
//! [`RuleSpec`] is the serde form of a built-in rule, used when record
//! schemas are loaded from YAML or JSON. Each entry is a map tagged by
//! `rule`:
//!
//! ```yaml
//! - { rule: min, value: 18 }
//! - { rule: pattern, regex: "^[a-z]+$" }
//! - { rule: one_of, values: [active, suspended] }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cascade_core::Value;

use crate::builtin::{Max, MaxLength, Min, MinLength, OneOf, Pattern};
use crate::rule::Rule;

/// Serializable description of a built-in rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSpec {
    Min { value: f64 },
    Max { value: f64 },
    MinLength { value: usize },
    MaxLength { value: usize },
    Pattern { regex: String },
    OneOf { values: Vec<serde_json::Value> },
}

/// A rule description that cannot be turned into a rule.
#[derive(Error, Debug)]
pub enum RuleSpecError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RuleSpec {
    /// Build the rule this spec describes.
    pub fn build(&self) -> Result<Arc<dyn Rule>, RuleSpecError> {
        let rule: Arc<dyn Rule> = match self {
            RuleSpec::Min { value } => Arc::new(Min::new(*value)),
            RuleSpec::Max { value } => Arc::new(Max::new(*value)),
            RuleSpec::MinLength { value } => Arc::new(MinLength::new(*value)),
            RuleSpec::MaxLength { value } => Arc::new(MaxLength::new(*value)),
            RuleSpec::Pattern { regex } => {
                let pattern = Pattern::new(regex).map_err(|source| RuleSpecError::InvalidPattern {
                    pattern: regex.clone(),
                    source,
                })?;
                Arc::new(pattern)
            }
            RuleSpec::OneOf { values } => {
                Arc::new(OneOf::new(values.iter().cloned().map(Value::from)))
            }
        };
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_form() {
        let spec: RuleSpec = serde_json::from_str(r#"{"rule": "min", "value": 18}"#).unwrap();
        assert_eq!(spec, RuleSpec::Min { value: 18.0 });
        let rule = spec.build().unwrap();
        assert_eq!(rule.name(), "min");
        assert!(rule.check(&10.into()).is_err());
    }

    #[test]
    fn test_one_of_values_become_values() {
        let spec: RuleSpec =
            serde_json::from_str(r#"{"rule": "one_of", "values": ["a", 1]}"#).unwrap();
        let rule = spec.build().unwrap();
        assert!(rule.check(&"a".into()).is_ok());
        assert!(rule.check(&1.into()).is_ok());
        assert!(rule.check(&"b".into()).is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let spec = RuleSpec::Pattern { regex: "[".into() };
        assert!(matches!(spec.build(), Err(RuleSpecError::InvalidPattern { .. })));
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        assert!(serde_json::from_str::<RuleSpec>(r#"{"rule": "nope"}"#).is_err());
    }
}
