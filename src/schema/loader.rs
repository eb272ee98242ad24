//! Route schema loader
//!
//! - Route schemas are stored as `<schema_dir>/*.json`, one route per file
//! - Each file names the route and carries an optional presence schema and
//!   optional typed fields
//! - Registered schemas are immutable
//!
//! File format:
//!
//! ```json
//! {
//!   "name": "create_user",
//!   "presence": { "params": { "org": true }, "body": { "user": { "name": true } } },
//!   "fields": { "name": { "type": "string", "required": true }, "tags": ["string"] }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use crate::observability::{log_event_with_fields, Event};
use crate::presence::PresenceSchema;

/// Everything a single request handler checks
#[derive(Debug, Clone)]
pub struct RouteSchema {
    pub name: String,
    pub presence: Option<PresenceSchema>,
    pub fields: Option<Schema>,
}

impl RouteSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presence: None,
            fields: None,
        }
    }

    pub fn with_presence(mut self, presence: PresenceSchema) -> Self {
        self.presence = Some(presence);
        self
    }

    pub fn with_fields(mut self, fields: Schema) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Parses a route schema document.
    pub fn from_value(source: &str, value: &Value) -> SchemaResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed_schema(source, "expected an object"))?;

        let name = match obj.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Err(SchemaError::malformed_schema(source, "missing 'name'")),
        };

        if let Some(extra) = obj
            .keys()
            .find(|k| !matches!(k.as_str(), "name" | "presence" | "fields"))
        {
            return Err(SchemaError::malformed_schema(
                source,
                format!("unexpected key '{}'", extra),
            ));
        }

        Ok(Self {
            name,
            presence: obj.get("presence").map(PresenceSchema::from_value).transpose()?,
            fields: obj.get("fields").map(Schema::from_value).transpose()?,
        })
    }

    /// Validates the route schema structure itself
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.name.is_empty() {
            return Err(SchemaError::malformed_schema("<in-memory>", "route name is empty"));
        }
        if let Some(fields) = &self.fields {
            fields.validate_structure()?;
        }
        Ok(())
    }
}

/// Schema loader that reads route schema files from disk and maintains an in-memory registry.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by route name
    schemas: HashMap<String, RouteSchema>,
}

impl SchemaLoader {
    /// Creates a new schema loader reading from the given directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads all schema files from the schema directory.
    ///
    /// A missing directory loads nothing. Malformed files abort the load.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // Directory order is platform dependent
        paths.sort();
        for path in paths {
            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let source = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(&source, format!("Failed to read file: {}", e))
        })?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed_schema(&source, format!("Invalid JSON: {}", e)))?;

        let schema = RouteSchema::from_value(&source, &value).map_err(|e| {
            log_event_with_fields(
                Event::SchemaRejected,
                &[("path", source.as_str()), ("error", e.message())],
            );
            e
        })?;

        let name = schema.name.clone();
        self.register(schema)?;
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("path", source.as_str()), ("route", name.as_str())],
        );

        Ok(())
    }

    /// Registers a schema directly (for testing or programmatic creation).
    pub fn register(&mut self, schema: RouteSchema) -> SchemaResult<()> {
        schema.validate_structure()?;

        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::schema_immutable(&schema.name));
        }

        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Gets a schema by route name.
    pub fn get(&self, name: &str) -> Option<&RouteSchema> {
        self.schemas.get(name)
    }

    /// Gets a schema by route name, failing if unknown.
    pub fn require(&self, name: &str) -> SchemaResult<&RouteSchema> {
        self.get(name).ok_or_else(|| SchemaError::unknown_schema(name))
    }

    /// Checks if a schema exists.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns all loaded schemas.
    pub fn all_schemas(&self) -> impl Iterator<Item = &RouteSchema> {
        self.schemas.values()
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
