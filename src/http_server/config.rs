//! Guard Configuration
//!
//! Controls how strict the guard is and how rejections look on the wire.

use std::fs;
use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::presence::PresenceMode;
use crate::schema::{DateArrayCheck, SchemaError, SchemaResult, ValidatorOptions};

/// Guard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Presence checking mode (default: first_miss)
    #[serde(default)]
    pub presence_mode: PresenceMode,

    /// How `[date]` fields are checked (default: container)
    #[serde(default)]
    pub date_array_check: DateArrayCheck,

    /// Status sent when a request is rejected (default: 400)
    #[serde(default = "default_reject_status")]
    pub reject_status: u16,

    /// Include failure messages in rejection bodies (default: true)
    #[serde(default = "default_expose_messages")]
    pub expose_messages: bool,

    /// Directory holding route schema files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_dir: Option<PathBuf>,

    /// Minimum log severity (default: info)
    #[serde(default)]
    pub log_level: Severity,
}

fn default_reject_status() -> u16 {
    400
}

fn default_expose_messages() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            presence_mode: PresenceMode::default(),
            date_array_check: DateArrayCheck::default(),
            reject_status: default_reject_status(),
            expose_messages: default_expose_messages(),
            schema_dir: None,
            log_level: Severity::default(),
        }
    }
}

impl GuardConfig {
    /// Load route schemas from a directory
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    /// Read a config from a JSON file
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(&source, format!("Failed to read config: {}", e))
        })?;
        let config: GuardConfig = serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed_schema(&source, format!("Invalid config: {}", e)))?;
        config
            .reject_status_code()
            .map_err(|reason| SchemaError::malformed_schema(&source, reason))?;
        Ok(config)
    }

    /// Rejection status as an HTTP status code
    pub fn reject_status_code(&self) -> Result<StatusCode, String> {
        StatusCode::from_u16(self.reject_status)
            .ok()
            .filter(|s| s.is_client_error())
            .ok_or_else(|| format!("reject_status {} is not a 4xx status", self.reject_status))
    }

    /// Options for the typed validator
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            date_array_check: self.date_array_check,
        }
    }
}
