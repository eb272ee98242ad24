//! Schema Invariant Tests
//!
//! Tests for typed payload validation:
//! - Validation is deterministic
//! - All required fields must be present
//! - No undeclared fields allowed
//! - Messages follow declaration order, undeclared keys last

use aeroguard::schema::{
    validate, FieldDef, FieldType, Rule, Schema, SchemaLoader, SchemaValidator,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn age_schema() -> Schema {
    Schema::new().field("age", FieldDef::required_number())
}

fn setup_test_loader() -> (TempDir, SchemaLoader) {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("signup.json"),
        serde_json::to_string(&json!({
            "name": "signup",
            "fields": {
                "email": {
                    "type": "string",
                    "required": true,
                    "validate": {"pattern": "^[^@]+@[^@]+$", "message": "{VALUE} is not an email"}
                },
                "age": {"type": "number", "validate": {"min": 13, "message": "{VALUE} is too young"}},
                "interests": ["string"],
                "birthday": "date"
            }
        }))
        .unwrap(),
    )
    .unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    (tmp, loader)
}

// =============================================================================
// Validation Determinism Tests
// =============================================================================

#[test]
fn test_validation_is_deterministic() {
    let schema = age_schema();
    let data = json!({"age": "five", "extra": 1});

    let first = validate(&data, &schema);
    for _ in 0..100 {
        assert_eq!(validate(&data, &schema), first);
    }
}

// =============================================================================
// Documented Examples
// =============================================================================

#[test]
fn test_required_number_present() {
    let result = validate(&json!({"age": 5}), &age_schema());
    assert!(result.pass);
    assert!(result.messages.is_empty());
}

#[test]
fn test_required_number_missing() {
    let result = validate(&json!({}), &age_schema());
    assert!(!result.pass);
    assert_eq!(result.messages, vec!["age is required"]);
}

#[test]
fn test_string_list() {
    let schema = Schema::new().field("tags", FieldDef::optional_array(FieldType::String));

    assert!(validate(&json!({"tags": ["a", "b"]}), &schema).pass);

    let result = validate(&json!({"tags": "a"}), &schema);
    assert!(!result.pass);
    assert_eq!(result.messages, vec!["tags must be a list"]);
}

#[test]
fn test_extra_key_against_empty_schema() {
    let result = validate(&json!({"extra": 1}), &Schema::new());
    assert!(!result.pass);
    assert_eq!(result.messages, vec!["extra not valid keys"]);
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_messages_follow_declaration_order() {
    let schema = Schema::new()
        .field("zeta", FieldDef::required_string())
        .field("alpha", FieldDef::required_string())
        .field("mid", FieldDef::optional_number());

    let result = validate(&json!({"mid": "x", "unknown_b": 1, "unknown_a": 2}), &schema);
    assert_eq!(
        result.messages,
        vec![
            "zeta is required",
            "alpha is required",
            "mid must be type Number",
            "unknown_b, unknown_a not valid keys",
        ]
    );
}

// =============================================================================
// Loaded Schema Tests
// =============================================================================

#[test]
fn test_loaded_schema_accepts_valid_payload() {
    let (_tmp, loader) = setup_test_loader();
    let fields = loader.require("signup").unwrap().fields.as_ref().unwrap();

    let result = validate(
        &json!({
            "email": "ann@example.com",
            "age": 30,
            "interests": ["chess"],
            "birthday": "1994-06-01"
        }),
        fields,
    );
    assert!(result.pass, "{:?}", result.messages);
}

#[test]
fn test_loaded_schema_collects_every_failure() {
    let (_tmp, loader) = setup_test_loader();
    let fields = loader.require("signup").unwrap().fields.as_ref().unwrap();

    let result = validate(
        &json!({
            "email": "nobody",
            "age": 9,
            "interests": ["chess", 3],
            "birthday": "someday",
            "admin": true
        }),
        fields,
    );
    assert!(!result.pass);
    assert_eq!(
        result.messages,
        vec![
            "nobody is not an email",
            "9 is too young",
            "interests must be an array of Strings.",
            "birthday must be valid date",
            "admin not valid keys",
        ]
    );
}

// =============================================================================
// Custom Validator Tests
// =============================================================================

#[test]
fn test_closure_validator() {
    let schema = Schema::new().field(
        "even",
        FieldDef::required_number().with_validator(
            Rule::custom(|v| v.as_i64().map_or(false, |n| n % 2 == 0)),
            "{VALUE} is odd",
        ),
    );
    let validator = SchemaValidator::new();

    assert!(validator.validate(&json!({"even": 4}), &schema).pass);
    assert_eq!(
        validator.validate(&json!({"even": 3}), &schema).messages,
        vec!["3 is odd"]
    );
}

#[test]
fn test_pass_iff_no_messages() {
    let schema = Schema::new()
        .field("name", FieldDef::required_string())
        .field("score", FieldDef::optional_number());
    let payloads = [
        json!({"name": "a"}),
        json!({"name": "a", "score": 1}),
        json!({"score": 1}),
        json!({"name": 1}),
        json!({"name": "a", "x": 1}),
    ];

    for data in payloads {
        let result = validate(&data, &schema);
        assert_eq!(result.pass, result.messages.is_empty());
    }
}
