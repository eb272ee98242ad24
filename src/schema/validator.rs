//! Typed payload validation
//!
//! Validation semantics, per declared field in declaration order:
//! - required fields must be present and truthy
//! - absent optional fields are skipped
//! - present values must match the declared type
//! - custom validators run only on correctly typed values
//! - data keys missing from the schema are rejected in one message
//!
//! Every failure is collected; a type failure only stops checks for its own field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::date::is_valid_date;
use super::errors::SchemaResult;
use super::types::{FieldDef, FieldType, Schema};
use crate::value::{is_truthy, type_tag};

/// Outcome of validating one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub pass: bool,
    pub messages: Vec<String>,
}

impl ValidationResult {
    fn from_messages(messages: Vec<String>) -> Self {
        Self {
            pass: messages.is_empty(),
            messages,
        }
    }
}

/// How elements of an `ArrayOf(Date)` field are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateArrayCheck {
    /// Elements fail only when the whole list does not parse as a date
    #[default]
    Container,
    /// Every element must parse as a date on its own
    PerElement,
}

/// Options for `SchemaValidator`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorOptions {
    pub date_array_check: DateArrayCheck,
}

/// Schema validator that checks payloads against typed schemas.
///
/// Validator does not mutate data.
/// Validation is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    options: ValidatorOptions,
}

impl SchemaValidator {
    /// Creates a validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the given options.
    pub fn with_options(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Validates a payload against a schema.
    ///
    /// Non-object data is treated as an empty object. The schema is assumed
    /// to be well formed; use [`SchemaValidator::validate_checked`] for
    /// schemas built outside the loader.
    pub fn validate(&self, data: &Value, schema: &Schema) -> ValidationResult {
        let empty = Map::new();
        let obj = data.as_object().unwrap_or(&empty);

        let mut messages = Vec::new();

        for (key, def) in schema.fields() {
            if let Some(message) = self.validate_field(key, def, obj.get(key)) {
                messages.push(message);
            }
        }

        let unknown: Vec<&str> = obj
            .keys()
            .map(String::as_str)
            .filter(|key| !schema.contains(key))
            .collect();
        if !unknown.is_empty() {
            messages.push(format!("{} not valid keys", unknown.join(", ")));
        }

        ValidationResult::from_messages(messages)
    }

    /// Checks the schema structure, then validates the payload.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the schema itself is malformed.
    pub fn validate_checked(&self, data: &Value, schema: &Schema) -> SchemaResult<ValidationResult> {
        schema.validate_structure()?;
        Ok(self.validate(data, schema))
    }

    /// Validates one declared field, returning its failure message if any.
    fn validate_field(&self, key: &str, def: &FieldDef, value: Option<&Value>) -> Option<String> {
        let value = match value.filter(|v| is_truthy(v)) {
            Some(v) => v,
            None if def.required => return Some(format!("{} is required", key)),
            None => return None,
        };

        if let Some(message) = self.check_type(key, &def.field_type, value) {
            return Some(message);
        }

        match &def.validate {
            Some(validator) if !validator.check(value) => Some(validator.render(value)),
            _ => None,
        }
    }

    /// Returns the type failure message for a present value, if any.
    fn check_type(&self, key: &str, field_type: &FieldType, value: &Value) -> Option<String> {
        match field_type {
            FieldType::ArrayOf(nested) => {
                let Some(items) = value.as_array() else {
                    return Some(format!("{} must be a list", key));
                };

                let bad_element = items
                    .iter()
                    .any(|item| self.element_fails(nested, item, value));
                if bad_element {
                    return Some(format!("{} must be an array of {}s.", key, nested.type_name()));
                }
                None
            }
            FieldType::Date => {
                if is_valid_date(value) {
                    None
                } else {
                    Some(format!("{} must be valid date", key))
                }
            }
            primitive => {
                if primitive.matches_tag(type_tag(value)) {
                    None
                } else {
                    Some(format!("{} must be type {}", key, primitive.type_name()))
                }
            }
        }
    }

    fn element_fails(&self, nested: &FieldType, item: &Value, whole: &Value) -> bool {
        match nested {
            FieldType::Date => match self.options.date_array_check {
                DateArrayCheck::Container => !is_valid_date(whole),
                DateArrayCheck::PerElement => !is_valid_date(item),
            },
            other => !other.matches_tag(type_tag(item)),
        }
    }
}

/// Validates a payload with default options.
pub fn validate(data: &Value, schema: &Schema) -> ValidationResult {
    SchemaValidator::new().validate(data, schema)
}
