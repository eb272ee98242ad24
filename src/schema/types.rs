//! Typed schema definitions
//!
//! Supported types:
//! - String, Number, Boolean, Object: primitive tags compared against the value
//! - Date: anything `date::parse_date` recognizes
//! - ArrayOf: a list whose elements carry a single nested type (one level only)

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use crate::value::display_value;

/// Placeholder replaced by the offending value in validator messages
pub const VALUE_PLACEHOLDER: &str = "{VALUE}";

/// Declared type of a field, set when the schema is authored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Text
    String,
    /// Any JSON number
    Number,
    /// true / false
    Boolean,
    /// Objects, arrays and null
    Object,
    /// A parseable calendar date or time
    Date,
    /// List of the nested type
    ArrayOf(Box<FieldType>),
}

impl FieldType {
    /// Shorthand for `ArrayOf`
    pub fn array_of(element_type: FieldType) -> Self {
        FieldType::ArrayOf(Box::new(element_type))
    }

    /// Returns the type name used in messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Object => "Object",
            FieldType::Date => "Date",
            FieldType::ArrayOf(_) => "Array",
        }
    }

    /// Returns true if the runtime tag of a value matches this type.
    ///
    /// The comparison ignores case, so `Number` matches the `number` tag.
    /// `Date` and `ArrayOf` never match a primitive tag.
    pub fn matches_tag(&self, tag: &str) -> bool {
        match self {
            FieldType::Date | FieldType::ArrayOf(_) => false,
            _ => self.type_name().eq_ignore_ascii_case(tag),
        }
    }

    /// Parses a type tag such as `"number"`, `"Date"` or `["string"]`.
    pub fn from_value(field: &str, value: &Value) -> SchemaResult<Self> {
        match value {
            Value::String(tag) => match tag.to_ascii_lowercase().as_str() {
                "string" => Ok(FieldType::String),
                "number" => Ok(FieldType::Number),
                "boolean" => Ok(FieldType::Boolean),
                "object" => Ok(FieldType::Object),
                "date" => Ok(FieldType::Date),
                _ => Err(SchemaError::unknown_type(field, tag.as_str())),
            },
            Value::Array(items) => {
                let [inner] = items.as_slice() else {
                    return Err(SchemaError::malformed_schema(
                        field,
                        "array type must wrap exactly one element type",
                    ));
                };
                if inner.is_array() {
                    return Err(SchemaError::nested_array(field));
                }
                Ok(FieldType::array_of(FieldType::from_value(field, inner)?))
            }
            other => Err(SchemaError::unknown_type(field, other.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::ArrayOf(inner) => write!(f, "[{}]", inner),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// Predicate run against a present, correctly typed value
#[derive(Clone)]
pub enum Rule {
    /// Caller supplied predicate
    Custom(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
    /// Rendered value must match the pattern
    Pattern(Regex),
    /// Numeric bounds, inclusive
    Range { min: Option<f64>, max: Option<f64> },
    /// Character count of strings or element count of arrays, inclusive
    Length { min: Option<usize>, max: Option<usize> },
    /// Value must equal one of the listed values
    OneOf(Vec<Value>),
}

impl Rule {
    /// Wraps a closure as a rule
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(predicate))
    }

    /// Evaluates the rule
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Rule::Custom(predicate) => predicate(value),
            Rule::Pattern(regex) => regex.is_match(&display_value(value)),
            Rule::Range { min, max } => match value.as_f64() {
                Some(n) => min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m),
                None => false,
            },
            Rule::Length { min, max } => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    _ => return false,
                };
                min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
            }
            Rule::OneOf(allowed) => allowed.contains(value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Custom(_) => write!(f, "Custom(<fn>)"),
            Rule::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Rule::Length { min, max } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .finish(),
            Rule::OneOf(allowed) => f.debug_tuple("OneOf").field(allowed).finish(),
        }
    }
}

/// Custom validator: a rule plus the message recorded when it fails
#[derive(Debug, Clone)]
pub struct CustomValidator {
    pub rule: Rule,
    /// May contain `{VALUE}`
    pub message: String,
}

impl CustomValidator {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }

    /// Returns true if the value satisfies the rule
    pub fn check(&self, value: &Value) -> bool {
        self.rule.check(value)
    }

    /// Renders the failure message for a value.
    ///
    /// Only the first placeholder is replaced.
    pub fn render(&self, value: &Value) -> String {
        self.message
            .replacen(VALUE_PLACEHOLDER, &display_value(value), 1)
    }

    /// Parses `{"pattern": .., "min": .., "max": .., "min_length": .., "max_length": .., "one_of": [..], "message": ..}`.
    ///
    /// Exactly one kind of rule may be declared.
    pub fn from_value(field: &str, value: &Value) -> SchemaResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid_rule(field, "validator must be an object"))?;

        let message = match obj.get("message") {
            Some(Value::String(m)) => m.clone(),
            Some(_) => return Err(SchemaError::invalid_rule(field, "message must be a string")),
            None => format!("{} is not a valid {}", VALUE_PLACEHOLDER, field),
        };

        let mut rules = Vec::new();

        if let Some(pattern) = obj.get("pattern") {
            let pattern = pattern
                .as_str()
                .ok_or_else(|| SchemaError::invalid_rule(field, "pattern must be a string"))?;
            let regex = Regex::new(pattern)
                .map_err(|e| SchemaError::invalid_rule(field, e.to_string()))?;
            rules.push(Rule::Pattern(regex));
        }

        if obj.contains_key("min") || obj.contains_key("max") {
            rules.push(Rule::Range {
                min: optional_f64(field, obj.get("min"))?,
                max: optional_f64(field, obj.get("max"))?,
            });
        }

        if obj.contains_key("min_length") || obj.contains_key("max_length") {
            rules.push(Rule::Length {
                min: optional_usize(field, obj.get("min_length"))?,
                max: optional_usize(field, obj.get("max_length"))?,
            });
        }

        if let Some(allowed) = obj.get("one_of") {
            let allowed = allowed
                .as_array()
                .ok_or_else(|| SchemaError::invalid_rule(field, "one_of must be a list"))?;
            rules.push(Rule::OneOf(allowed.clone()));
        }

        match rules.len() {
            1 => Ok(Self::new(rules.remove(0), message)),
            0 => Err(SchemaError::invalid_rule(field, "no rule declared")),
            _ => Err(SchemaError::invalid_rule(field, "only one rule may be declared")),
        }
    }
}

fn optional_f64(field: &str, value: Option<&Value>) -> SchemaResult<Option<f64>> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| SchemaError::invalid_rule(field, "bounds must be numbers")),
    }
}

fn optional_usize(field: &str, value: Option<&Value>) -> SchemaResult<Option<usize>> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                SchemaError::invalid_rule(field, "length bounds must be non-negative integers")
            }),
    }
}

/// Field definition in a typed schema
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub field_type: FieldType,
    pub required: bool,
    pub validate: Option<CustomValidator>,
}

impl FieldDef {
    /// Create a required field
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            validate: None,
        }
    }

    /// Create an optional field
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            validate: None,
        }
    }

    /// Create a required string field
    pub fn required_string() -> Self {
        Self::required(FieldType::String)
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self::optional(FieldType::String)
    }

    /// Create a required number field
    pub fn required_number() -> Self {
        Self::required(FieldType::Number)
    }

    /// Create an optional number field
    pub fn optional_number() -> Self {
        Self::optional(FieldType::Number)
    }

    /// Create an optional array field
    pub fn optional_array(element_type: FieldType) -> Self {
        Self::optional(FieldType::array_of(element_type))
    }

    /// Attach a custom validator
    pub fn with_validator(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.validate = Some(CustomValidator::new(rule, message));
        self
    }

    /// Parses a field entry.
    ///
    /// Accepts a bare type (`"string"`, `["number"]`) or the full form
    /// `{"type": .., "required": .., "validate": {..}}`.
    pub fn from_value(field: &str, value: &Value) -> SchemaResult<Self> {
        let Value::Object(obj) = value else {
            return Ok(Self::optional(FieldType::from_value(field, value)?));
        };

        let field_type = match obj.get("type") {
            Some(tag) => FieldType::from_value(field, tag)?,
            None => {
                return Err(SchemaError::malformed_schema(field, "field is missing 'type'"));
            }
        };

        let required = match obj.get("required") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(SchemaError::malformed_schema(field, "'required' must be a boolean"));
            }
        };

        let validate = obj
            .get("validate")
            .map(|v| CustomValidator::from_value(field, v))
            .transpose()?;

        Ok(Self {
            field_type,
            required,
            validate,
        })
    }
}

/// Typed schema: field definitions in declaration order
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldDef)>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field, replacing an earlier declaration of the same name in place
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = def,
            None => self.fields.push((name, def)),
        }
        self
    }

    /// Look up a field definition
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, def)| def)
    }

    /// Returns true if the field is declared
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(n, def)| (n.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        for (name, def) in &self.fields {
            if let FieldType::ArrayOf(inner) = &def.field_type {
                if matches!(**inner, FieldType::ArrayOf(_)) {
                    return Err(SchemaError::nested_array(name.as_str()));
                }
            }
        }
        Ok(())
    }

    /// Parses a JSON object of field entries, keeping declaration order
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed_schema("fields", "expected an object"))?;

        let mut schema = Schema::new();
        for (name, entry) in obj {
            schema = schema.field(name.as_str(), FieldDef::from_value(name, entry)?);
        }
        schema.validate_structure()?;
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::String.type_name(), "String");
        assert_eq!(FieldType::Number.type_name(), "Number");
        assert_eq!(FieldType::Boolean.type_name(), "Boolean");
        assert_eq!(FieldType::Object.type_name(), "Object");
        assert_eq!(FieldType::Date.type_name(), "Date");
        assert_eq!(FieldType::array_of(FieldType::String).type_name(), "Array");
        assert_eq!(FieldType::array_of(FieldType::Date).to_string(), "[Date]");
    }

    #[test]
    fn test_matches_tag_ignores_case() {
        assert!(FieldType::Number.matches_tag("number"));
        assert!(FieldType::Object.matches_tag("object"));
        assert!(!FieldType::String.matches_tag("number"));
        assert!(!FieldType::Date.matches_tag("date"));
    }

    #[test]
    fn test_parse_type_tags() {
        assert_eq!(FieldType::from_value("a", &json!("Number")).unwrap(), FieldType::Number);
        assert_eq!(FieldType::from_value("a", &json!("date")).unwrap(), FieldType::Date);
        assert_eq!(
            FieldType::from_value("a", &json!(["string"])).unwrap(),
            FieldType::array_of(FieldType::String)
        );
    }

    #[test]
    fn test_unknown_type_is_config_error() {
        let err = FieldType::from_value("age", &json!("integer")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaUnknownType);
        assert!(err.is_config());
    }

    #[test]
    fn test_nested_array_rejected() {
        let err = FieldType::from_value("grid", &json!([["number"]])).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaNestedArray);

        let schema = Schema::new().field(
            "grid",
            FieldDef::optional(FieldType::array_of(FieldType::array_of(FieldType::Number))),
        );
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_field_shorthand_and_full_form() {
        let short = FieldDef::from_value("name", &json!("string")).unwrap();
        assert_eq!(short.field_type, FieldType::String);
        assert!(!short.required);

        let full = FieldDef::from_value(
            "age",
            &json!({"type": "number", "required": true, "validate": {"min": 0, "message": "{VALUE} is negative"}}),
        )
        .unwrap();
        assert_eq!(full.field_type, FieldType::Number);
        assert!(full.required);
        assert!(full.validate.is_some());
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let err = FieldDef::from_value("age", &json!({"required": true})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaMalformed);
    }

    #[test]
    fn test_schema_keeps_declaration_order() {
        let schema = Schema::from_value(&json!({
            "zeta": "string",
            "alpha": "number",
            "mid": ["boolean"]
        }))
        .unwrap();
        let names: Vec<_> = schema.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_redeclared_field_replaced_in_place() {
        let schema = Schema::new()
            .field("a", FieldDef::optional_string())
            .field("b", FieldDef::optional_string())
            .field("a", FieldDef::required_number());
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("a").unwrap().field_type, FieldType::Number);
    }

    #[test]
    fn test_rules() {
        let pattern = Rule::Pattern(Regex::new("^[a-z]+$").unwrap());
        assert!(pattern.check(&json!("abc")));
        assert!(!pattern.check(&json!("ABC")));

        let range = Rule::Range { min: Some(1.0), max: Some(10.0) };
        assert!(range.check(&json!(5)));
        assert!(!range.check(&json!(11)));
        assert!(!range.check(&json!("5")));

        let length = Rule::Length { min: None, max: Some(3) };
        assert!(length.check(&json!("héé")));
        assert!(!length.check(&json!([1, 2, 3, 4])));

        let one_of = Rule::OneOf(vec![json!("red"), json!("blue")]);
        assert!(one_of.check(&json!("red")));
        assert!(!one_of.check(&json!("green")));

        let custom = Rule::custom(|v| v.as_i64() == Some(7));
        assert!(custom.check(&json!(7)));
    }

    #[test]
    fn test_validator_parsing_errors() {
        let err = CustomValidator::from_value("x", &json!({"pattern": "("})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaInvalidRule);

        let err = CustomValidator::from_value("x", &json!({"message": "nope"})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaInvalidRule);

        let err = CustomValidator::from_value("x", &json!({"min": 1, "pattern": "a"})).unwrap_err();
        assert!(err.message().contains("only one rule"));
    }

    #[test]
    fn test_render_replaces_first_placeholder() {
        let validator = CustomValidator::new(Rule::custom(|_| false), "{VALUE} and {VALUE}");
        assert_eq!(validator.render(&json!("x")), "x and {VALUE}");
    }
}
