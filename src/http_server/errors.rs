//! # Guard Errors
//!
//! Rejections produced by the request guard.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Request guard errors
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Declared keys absent from params or body
    #[error("Missing required keys")]
    MissingKeys {
        status: StatusCode,
        messages: Vec<String>,
    },

    /// Payload failed its typed schema
    #[error("Invalid payload")]
    InvalidPayload {
        status: StatusCode,
        messages: Vec<String>,
    },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Route schema missing or malformed
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl GuardError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GuardError::MissingKeys { status, .. } => *status,
            GuardError::InvalidPayload { status, .. } => *status,
            GuardError::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Failure messages carried by the rejection
    pub fn messages(&self) -> &[String] {
        match self {
            GuardError::MissingKeys { messages, .. } => messages,
            GuardError::InvalidPayload { messages, .. } => messages,
            GuardError::Schema(_) => &[],
        }
    }

    /// Drop the failure messages, keeping only the status
    pub fn without_messages(self) -> Self {
        match self {
            GuardError::MissingKeys { status, .. } => GuardError::MissingKeys {
                status,
                messages: Vec::new(),
            },
            GuardError::InvalidPayload { status, .. } => GuardError::InvalidPayload {
                status,
                messages: Vec::new(),
            },
            other => other,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl From<GuardError> for ErrorResponse {
    fn from(err: GuardError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
            messages: err.messages().to_vec(),
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
