//! Errors raised while declaring schemas, loading them from files, and
//! building records. Validation failures themselves use the core taxonomy
//! ([`ValidationError`](cascade_core::ValidationError),
//! [`CascadeError`](cascade_core::CascadeError)).

use std::path::PathBuf;

use cascade_rules::RuleSpecError;
use thiserror::Error;

/// An inconsistent schema declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },
}

/// A schema file or document that could not be loaded.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    #[error("io error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported schema file '{}': expected .yaml, .yml or .json", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field '{field}': {source}")]
    InvalidRule {
        field: String,
        #[source]
        source: RuleSpecError,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A record that cannot be built from the given values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record '{record}' is missing a value for field '{field}'")]
    MissingField { record: String, field: String },

    #[error("record '{record}' has no field '{field}'")]
    UnknownField { record: String, field: String },

    #[error("record '{record}' can only be built from a JSON object")]
    NotAnObject { record: String },
}
