//! # cascade-core — Values, Descriptors, Type Checking and Coercion
//!
//! The leaf of the Cascade workspace. It knows nothing about rules or
//! records; those live in `cascade-rules` and `cascade-record`, which depend
//! on this crate and never the other way around.
//!
//! ## Components
//!
//! - [`Value`]: the dynamic value model.
//! - [`TypeDescriptor`]: closed sum type describing an expected shape
//!   (`Any | Primitive | Union | Container | Custom`), with a text form.
//! - [`TypeRegistry`]: exact-descriptor → custom validator storage.
//! - [`TypeChecker`]: the recursive dispatcher `validate_type`.
//! - [`CoercionRegistry`] / [`CoercionEngine`]: opt-in conversion with
//!   post-hoc verification of the result.
//! - [`error`]: the error taxonomy shared by every Cascade crate.
//!
//! ## Crate Policy
//!
//! - Registries are explicitly owned values passed by reference; there is
//!   no global state in this crate.
//! - Fail-fast: every operation reports the first failure only.
//! - No `unsafe`, no `.unwrap()` outside tests.

pub mod coercion;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod types;
pub mod value;

pub use coercion::{Coercer, CoercionEngine, CoercionRegistry};
pub use descriptor::{ContainerKind, DescriptorParseError, PrimitiveType, TypeDescriptor, TypeName};
pub use error::{
    BoxError, CascadeError, CoercionError, CoercionErrorKind, RuleValidationError,
    TypeValidationError, ValidationError,
};
pub use registry::{TypeRegistry, Validator};
pub use types::TypeChecker;
pub use value::{CustomValue, Value, ValueKind};
