//! Schema error types
//!
//! These describe problems with the schema itself, never with the data
//! being validated. Data failures are reported as `ValidationResult`
//! messages instead.
//!
//! Error codes:
//! - AERO_SCHEMA_UNKNOWN_TYPE (CONFIG)
//! - AERO_SCHEMA_NESTED_ARRAY (CONFIG)
//! - AERO_SCHEMA_INVALID_RULE (CONFIG)
//! - AERO_SCHEMA_MALFORMED (CONFIG)
//! - AERO_SCHEMA_IMMUTABLE (REJECT)
//! - AERO_UNKNOWN_SCHEMA (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected
    Reject,
    /// Schema definition is unusable and must be fixed by its author
    Config,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Config => write!(f, "CONFIG"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field declares a type tag that is not recognized
    AeroSchemaUnknownType,
    /// Array type nested inside another array type
    AeroSchemaNestedArray,
    /// Custom validator rule cannot be built
    AeroSchemaInvalidRule,
    /// Schema document has the wrong shape or cannot be read
    AeroSchemaMalformed,
    /// Attempt to replace an already registered schema
    AeroSchemaImmutable,
    /// Named schema not found
    AeroUnknownSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AeroSchemaUnknownType => "AERO_SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::AeroSchemaNestedArray => "AERO_SCHEMA_NESTED_ARRAY",
            SchemaErrorCode::AeroSchemaInvalidRule => "AERO_SCHEMA_INVALID_RULE",
            SchemaErrorCode::AeroSchemaMalformed => "AERO_SCHEMA_MALFORMED",
            SchemaErrorCode::AeroSchemaImmutable => "AERO_SCHEMA_IMMUTABLE",
            SchemaErrorCode::AeroUnknownSchema => "AERO_UNKNOWN_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::AeroSchemaImmutable | SchemaErrorCode::AeroUnknownSchema => {
                Severity::Reject
            }
            _ => Severity::Config,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Field path if applicable
    field: Option<String>,
}

impl SchemaError {
    /// Create an unknown type tag error
    pub fn unknown_type(field: impl Into<String>, tag: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AeroSchemaUnknownType,
            message: format!("Field '{}' declares unknown type '{}'", field, tag.into()),
            field: Some(field),
        }
    }

    /// Create a nested array error
    pub fn nested_array(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AeroSchemaNestedArray,
            message: format!("Field '{}' nests an array inside an array", field),
            field: Some(field),
        }
    }

    /// Create an invalid validator rule error
    pub fn invalid_rule(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AeroSchemaInvalidRule,
            message: format!("Field '{}' has an invalid validator: {}", field, reason.into()),
            field: Some(field),
        }
    }

    /// Create an error for a malformed schema document
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroSchemaMalformed,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            field: None,
        }
    }

    /// Create a schema immutable error
    pub fn schema_immutable(name: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroSchemaImmutable,
            message: format!("Schema '{}' is already registered", name.into()),
            field: None,
        }
    }

    /// Create an unknown schema error
    pub fn unknown_schema(name: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroUnknownSchema,
            message: format!("Schema '{}' not found", name.into()),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether the schema author has to fix this
    pub fn is_config(&self) -> bool {
        self.severity() == Severity::Config
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
