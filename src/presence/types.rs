//! Presence schema definitions
//!
//! A presence schema only says which keys must exist. Each key maps either
//! to a required marker or to a nested presence schema checked against the
//! corresponding nested value.

use serde_json::Value;

use crate::schema::{SchemaError, SchemaResult};

/// What a declared key demands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceRule {
    /// Key must be present
    Required,
    /// Key must be present and its value must satisfy the nested node
    Nested(PresenceNode),
}

/// Ordered set of keys checked against one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceNode {
    keys: Vec<(String, PresenceRule)>,
}

impl PresenceNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required key
    pub fn require(self, key: impl Into<String>) -> Self {
        self.rule(key, PresenceRule::Required)
    }

    /// Declare a key whose value must contain the nested keys
    pub fn nested(self, key: impl Into<String>, node: PresenceNode) -> Self {
        self.rule(key, PresenceRule::Nested(node))
    }

    fn rule(mut self, key: impl Into<String>, rule: PresenceRule) -> Self {
        let key = key.into();
        match self.keys.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = rule,
            None => self.keys.push((key, rule)),
        }
        self
    }

    /// Iterate keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = (&str, &PresenceRule)> {
        self.keys.iter().map(|(k, rule)| (k.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Parses `{"id": true, "user": {"name": true}}`.
    ///
    /// Objects nest; any other value is a required marker.
    pub fn from_value(source: &str, value: &Value) -> SchemaResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed_schema(source, "presence schema must be an object"))?;

        let mut node = PresenceNode::new();
        for (key, entry) in obj {
            node = match entry {
                Value::Object(_) => {
                    let path = format!("{}.{}", source, key);
                    node.nested(key.as_str(), PresenceNode::from_value(&path, entry)?)
                }
                _ => node.require(key.as_str()),
            };
        }
        Ok(node)
    }
}

/// Presence requirements for a request's path parameters and body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSchema {
    pub params: Option<PresenceNode>,
    pub body: Option<PresenceNode>,
}

impl PresenceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: PresenceNode) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_body(mut self, body: PresenceNode) -> Self {
        self.body = Some(body);
        self
    }

    /// Parses `{"params": {..}, "body": {..}}`; both sections are optional.
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed_schema("presence", "expected an object"))?;

        if let Some(extra) = obj.keys().find(|k| *k != "params" && *k != "body") {
            return Err(SchemaError::malformed_schema(
                "presence",
                format!("unexpected section '{}'", extra),
            ));
        }

        Ok(Self {
            params: obj
                .get("params")
                .map(|v| PresenceNode::from_value("params", v))
                .transpose()?,
            body: obj
                .get("body")
                .map(|v| PresenceNode::from_value("body", v))
                .transpose()?,
        })
    }
}
