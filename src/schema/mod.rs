//! Typed schema validation for request payloads
//!
//! # Design Principles
//!
//! - Field types are a closed enum fixed when the schema is authored
//! - Every failure is reported, in declaration order
//! - Undeclared keys are rejected
//! - Schema mistakes are `SchemaError`s, never validation messages
//! - Deterministic validation

mod date;
mod errors;
mod loader;
mod types;
mod validator;

pub use date::{is_valid_date, parse_date};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::{RouteSchema, SchemaLoader};
pub use types::{CustomValidator, FieldDef, FieldType, Rule, Schema, VALUE_PLACEHOLDER};
pub use validator::{validate, DateArrayCheck, SchemaValidator, ValidationResult, ValidatorOptions};
