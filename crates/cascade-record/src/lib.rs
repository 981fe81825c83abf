//! # cascade-record — Record Schemas and Validation Orchestration
//!
//! Turns a set of typed, rule-carrying fields into something that can be
//! validated as a whole.
//!
//! - [`Field`] / [`RecordSchema`]: declarations, built in code or loaded
//!   from YAML/JSON.
//! - [`Record`]: the interface a value holder implements; [`DynamicRecord`]
//!   is the runtime-shaped implementation.
//! - [`ValidationOrchestrator`]: type check, then rules, per field, first
//!   failure wins.
//!
//! Validation is always explicit. Building or mutating a record never
//! triggers it.

pub mod error;
pub mod field;
pub mod record;
pub mod schema;
pub mod validate;

pub use error::{RecordError, SchemaError, SchemaLoadError};
pub use field::{Field, FieldDefault};
pub use record::{DynamicRecord, Record};
pub use schema::{RecordSchema, RecordSchemaBuilder};
pub use validate::ValidationOrchestrator;
