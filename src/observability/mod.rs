//! Observability for the guard
//!
//! Provides:
//! - Structured logging (JSON)
//! - Validation counters
//! - Typed lifecycle events
//!
//! The validators never log; only the guard and the schema loader do.
//!
//! # Usage
//!
//! ```ignore
//! use aeroguard::observability::{Logger, Event, ValidationMetrics};
//!
//! Logger::info("SCHEMA_LOADED", &[("route", "create_user")]);
//!
//! let metrics = ValidationMetrics::new();
//! metrics.record_payload(false);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ValidationMetrics};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_error() {
        Severity::Error
    } else if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
