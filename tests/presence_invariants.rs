//! Presence Invariant Tests
//!
//! - Every declared key must be present, recursively
//! - Explicit `false` counts as present
//! - Each recursive call stops at its first missing key
//! - `params` and `body` are checked independently

use aeroguard::presence::{
    is_valid, PresenceChecker, PresenceMode, PresenceNode, PresenceSchema,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn schema_from(value: serde_json::Value) -> PresenceSchema {
    PresenceSchema::from_value(&value).unwrap()
}

// =============================================================================
// Flat Presence Tests
// =============================================================================

/// `{params:{id:true}}` accepts an explicit false.
#[test]
fn test_false_flag_is_present() {
    let schema = schema_from(json!({"params": {"id": true}}));
    assert!(is_valid(&schema, Some(&json!({"id": false})), None));
}

/// `{params:{id:true}}` rejects an empty params object.
#[test]
fn test_empty_params_rejected() {
    let schema = schema_from(json!({"params": {"id": true}}));
    let report = PresenceChecker::new().check(&schema, Some(&json!({})), None);

    assert!(!report.is_valid());
    assert_eq!(report.message().unwrap(), "Missing: \nid (params) \n");
}

/// Absent containers mark every declared section as failing.
#[test]
fn test_absent_containers() {
    let schema = schema_from(json!({"params": {"id": true}, "body": {"name": true}}));
    let report = PresenceChecker::new().check(&schema, None, None);

    assert_eq!(report.lines(), vec!["id (params)", "name (body)"]);
}

// =============================================================================
// Nested Presence Tests
// =============================================================================

#[test]
fn test_nested_user_name() {
    let schema = schema_from(json!({"body": {"user": {"name": true}}}));

    assert!(is_valid(&schema, None, Some(&json!({"user": {"name": "a"}}))));
    assert!(!is_valid(&schema, None, Some(&json!({"user": {}}))));
    assert!(!is_valid(&schema, None, Some(&json!({}))));
}

/// A missing parent is reported by name without descending into it.
#[test]
fn test_missing_parent_reported_once() {
    let schema = schema_from(json!({"body": {"user": {"name": true, "email": true}}}));
    let report = PresenceChecker::new().check(&schema, None, Some(&json!({"other": 1})));

    assert_eq!(report.lines(), vec!["user (body)"]);
}

/// Each nested level reports its own first miss.
#[test]
fn test_first_miss_per_level() {
    let schema = schema_from(json!({
        "body": {
            "a": {"x": true, "y": true},
            "b": {"z": true},
            "c": true,
            "d": true
        }
    }));
    let report = PresenceChecker::new().check(
        &schema,
        None,
        Some(&json!({"a": {}, "b": {}})),
    );

    assert_eq!(report.lines(), vec!["x (body)", "z (body)", "c (body)"]);
}

#[test]
fn test_exhaustive_mode_finds_every_key() {
    let schema = schema_from(json!({
        "params": {"org": true},
        "body": {"a": {"x": true, "y": true}, "c": true, "d": true}
    }));
    let report = PresenceChecker::with_mode(PresenceMode::Exhaustive).check(
        &schema,
        Some(&json!({"org": "acme"})),
        Some(&json!({"a": {"y": 0}})),
    );

    assert_eq!(
        report.lines(),
        vec!["a.x (body)", "a.y (body)", "c (body)", "d (body)"]
    );
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// The same request yields the same report every time.
#[test]
fn test_presence_is_deterministic() {
    let schema = PresenceSchema::new()
        .with_params(PresenceNode::new().require("id"))
        .with_body(PresenceNode::new().require("title").require("body"));
    let params = json!({});
    let body = json!({"body": "text"});

    let first = PresenceChecker::new().check(&schema, Some(&params), Some(&body));
    for _ in 0..100 {
        assert_eq!(
            PresenceChecker::new().check(&schema, Some(&params), Some(&body)),
            first
        );
    }
}

/// For flat schemas, validity holds exactly when every key is present.
#[test]
fn test_valid_iff_all_keys_present() {
    let schema = schema_from(json!({"body": {"a": true, "b": true}}));
    let cases = [
        (json!({"a": 1, "b": 2}), true),
        (json!({"a": 1, "b": false}), true),
        (json!({"a": 1}), false),
        (json!({"b": 1}), false),
        (json!({"a": "", "b": 1}), false),
        (json!({"a": null, "b": 1}), false),
        (json!({}), false),
    ];

    for (body, expected) in cases {
        assert_eq!(is_valid(&schema, None, Some(&body)), expected, "body: {}", body);
    }
}

// =============================================================================
// Array Container Tests
// =============================================================================

/// Nested keys look up array elements by index.
#[test]
fn test_nested_array_index() {
    let schema = schema_from(json!({"body": {"items": {"0": true}}}));

    assert!(is_valid(&schema, None, Some(&json!({"items": ["x"]}))));

    let report = PresenceChecker::new().check(&schema, None, Some(&json!({"items": []})));
    assert_eq!(report.lines(), vec!["0 (body)"]);
}
