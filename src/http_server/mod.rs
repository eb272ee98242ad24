//! # HTTP Guard Module
//!
//! Applies validation outcomes to HTTP exchanges.
//!
//! - `is_valid` sends `400 Bad Request` through a [`StatusSink`] when keys are missing
//! - `RequestGuard` runs named route schemas and returns [`GuardError`] rejections
//!   that render as JSON responses
//! - `metrics_routes` serves the guard's counters at `/metrics`

pub mod config;
pub mod errors;
pub mod guard;
pub mod routes;

pub use config::GuardConfig;
pub use errors::{ErrorResponse, GuardError, GuardResult};
pub use guard::{is_valid, RecordedStatus, RequestGuard, RequestLike, RequestPayload, StatusSink};
pub use routes::metrics_routes;
