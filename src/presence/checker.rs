//! Presence checking of required request keys
//!
//! A key is missing when its container is absent or neither an object nor an
//! array, when the key is absent, or when its value is falsy. Arrays are looked
//! up by canonical decimal index, so `"0"` finds the first element and `"01"`
//! finds nothing. An explicit `false` counts as
//! present so boolean flags can be sent switched off.
//!
//! In `FirstMiss` mode each recursive call stops at its first missing key.
//! Recursing into a nested node does not stop the parent, and `params` and
//! `body` are always both checked.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{PresenceNode, PresenceRule, PresenceSchema};
use crate::value::is_truthy;

/// Request container a missing key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Body,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Params => "params",
            Location::Body => "body",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared key that was not found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKey {
    pub key: String,
    pub location: Location,
}

/// How far the checker looks after a miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceMode {
    /// Stop each recursive call at its first missing key, reporting bare key names
    #[default]
    FirstMiss,
    /// Report every missing key with its dotted path
    Exhaustive,
}

/// Result of a presence check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresenceReport {
    missing: Vec<MissingKey>,
}

impl PresenceReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing(&self) -> &[MissingKey] {
        &self.missing
    }

    /// Renders the `Missing:` report, one line per miss.
    ///
    /// Returns `None` when nothing is missing.
    pub fn message(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        let mut message = String::from("Missing: \n");
        for miss in &self.missing {
            message.push_str(&format!("{} ({}) \n", miss.key, miss.location));
        }
        Some(message)
    }

    /// Missing keys as `key (location)` strings
    pub fn lines(&self) -> Vec<String> {
        self.missing
            .iter()
            .map(|miss| format!("{} ({})", miss.key, miss.location))
            .collect()
    }
}

/// Checks request containers against presence schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceChecker {
    mode: PresenceMode,
}

impl PresenceChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: PresenceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PresenceMode {
        self.mode
    }

    /// Checks `params` and `body` against the schema sections that are declared.
    pub fn check(
        &self,
        schema: &PresenceSchema,
        params: Option<&Value>,
        body: Option<&Value>,
    ) -> PresenceReport {
        let mut report = PresenceReport::default();

        if let Some(node) = &schema.params {
            self.walk(params, node, "", Location::Params, &mut report.missing);
        }
        if let Some(node) = &schema.body {
            self.walk(body, node, "", Location::Body, &mut report.missing);
        }

        report
    }

    fn walk(
        &self,
        container: Option<&Value>,
        node: &PresenceNode,
        prefix: &str,
        location: Location,
        missing: &mut Vec<MissingKey>,
    ) {
        for (key, rule) in node.keys() {
            let value = lookup(container, key);

            if is_missing(value) {
                let key = match self.mode {
                    PresenceMode::FirstMiss => key.to_string(),
                    PresenceMode::Exhaustive => make_path(prefix, key),
                };
                missing.push(MissingKey { key, location });

                match self.mode {
                    PresenceMode::FirstMiss => return,
                    PresenceMode::Exhaustive => continue,
                }
            }

            if let PresenceRule::Nested(inner) = rule {
                self.walk(value, inner, &make_path(prefix, key), location, missing);
            }
        }
    }
}

/// Checks presence with the default first-miss mode.
pub fn is_valid(schema: &PresenceSchema, params: Option<&Value>, body: Option<&Value>) -> bool {
    PresenceChecker::new().check(schema, params, body).is_valid()
}

fn lookup<'a>(container: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    match container? {
        Value::Object(obj) => obj.get(key),
        Value::Array(items) => {
            let index: usize = key.parse().ok()?;
            if index.to_string() != key {
                return None;
            }
            items.get(index)
        }
        _ => None,
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Bool(false)) => false,
        Some(v) => !is_truthy(v),
    }
}

fn make_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id_schema() -> PresenceSchema {
        PresenceSchema::new().with_params(PresenceNode::new().require("id"))
    }

    #[test]
    fn test_explicit_false_counts_as_present() {
        assert!(is_valid(&id_schema(), Some(&json!({"id": false})), None));
    }

    #[test]
    fn test_missing_param() {
        let report = PresenceChecker::new().check(&id_schema(), Some(&json!({})), None);
        assert!(!report.is_valid());
        assert_eq!(report.lines(), vec!["id (params)"]);
        assert_eq!(report.message().unwrap(), "Missing: \nid (params) \n");
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        for value in [json!(null), json!(0), json!("")] {
            assert!(!is_valid(&id_schema(), Some(&json!({"id": value})), None));
        }
    }

    #[test]
    fn test_absent_container_marks_keys_missing() {
        let report = PresenceChecker::new().check(&id_schema(), None, None);
        assert_eq!(report.missing().len(), 1);
        assert_eq!(report.missing()[0].location, Location::Params);
    }

    #[test]
    fn test_nested_presence() {
        let schema = PresenceSchema::new()
            .with_body(PresenceNode::new().nested("user", PresenceNode::new().require("name")));

        assert!(is_valid(&schema, None, Some(&json!({"user": {"name": "a"}}))));
        assert!(!is_valid(&schema, None, Some(&json!({"user": {}}))));
        assert!(!is_valid(&schema, None, Some(&json!({"user": "a"}))));
    }

    #[test]
    fn test_first_miss_stops_within_a_node() {
        let schema = PresenceSchema::new().with_body(PresenceNode::new().require("a").require("b"));
        let report = PresenceChecker::new().check(&schema, None, Some(&json!({})));
        assert_eq!(report.lines(), vec!["a (body)"]);
    }

    #[test]
    fn test_nested_miss_does_not_stop_parent() {
        let schema = PresenceSchema::new().with_body(
            PresenceNode::new()
                .nested("user", PresenceNode::new().require("name"))
                .require("token"),
        );
        let report = PresenceChecker::new().check(&schema, None, Some(&json!({"user": {"x": 1}})));
        assert_eq!(report.lines(), vec!["name (body)", "token (body)"]);
    }

    #[test]
    fn test_params_and_body_checked_independently() {
        let schema = PresenceSchema::new()
            .with_params(PresenceNode::new().require("id"))
            .with_body(PresenceNode::new().require("title"));
        let report = PresenceChecker::new().check(&schema, Some(&json!({})), Some(&json!({})));
        assert_eq!(
            report.message().unwrap(),
            "Missing: \nid (params) \ntitle (body) \n"
        );
    }

    #[test]
    fn test_exhaustive_mode_reports_every_key_with_paths() {
        let schema = PresenceSchema::new().with_body(
            PresenceNode::new()
                .require("a")
                .require("b")
                .nested("user", PresenceNode::new().require("name").require("email")),
        );
        let report = PresenceChecker::with_mode(PresenceMode::Exhaustive).check(
            &schema,
            None,
            Some(&json!({"user": {}})),
        );
        assert_eq!(
            report.lines(),
            vec!["a (body)", "b (body)", "user.name (body)", "user.email (body)"]
        );
    }

    #[test]
    fn test_array_containers_indexed_by_position() {
        let schema = PresenceSchema::new()
            .with_body(PresenceNode::new().nested("items", PresenceNode::new().require("0")));

        assert!(is_valid(&schema, None, Some(&json!({"items": ["x"]}))));
        assert!(!is_valid(&schema, None, Some(&json!({"items": []}))));
        assert!(!is_valid(&schema, None, Some(&json!({"items": [""]}))));
    }

    #[test]
    fn test_non_canonical_index_not_found() {
        let schema = PresenceSchema::new()
            .with_body(PresenceNode::new().nested("items", PresenceNode::new().require("01")));

        assert!(!is_valid(&schema, None, Some(&json!({"items": ["a", "b"]}))));
    }

    #[test]
    fn test_undeclared_sections_ignored() {
        let schema = PresenceSchema::new();
        assert!(is_valid(&schema, None, None));
    }

    #[test]
    fn test_valid_report_has_no_message() {
        let report = PresenceChecker::new().check(&id_schema(), Some(&json!({"id": 7})), None);
        assert!(report.message().is_none());
    }
}
