//! Validation counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for guard activity
///
/// All counters use Relaxed atomics; a snapshot may mix values from
/// concurrent requests.
#[derive(Debug, Default)]
pub struct ValidationMetrics {
    presence_checks: AtomicU64,
    presence_failures: AtomicU64,
    payload_checks: AtomicU64,
    payload_failures: AtomicU64,
    schemas_loaded: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub presence_checks: u64,
    pub presence_failures: u64,
    pub payload_checks: u64,
    pub payload_failures: u64,
    pub schemas_loaded: u64,
}

impl ValidationMetrics {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a presence check and whether it passed
    pub fn record_presence(&self, passed: bool) {
        self.presence_checks.fetch_add(1, Ordering::Relaxed);
        if !passed {
            self.presence_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a payload validation and whether it passed
    pub fn record_payload(&self, passed: bool) {
        self.payload_checks.fetch_add(1, Ordering::Relaxed);
        if !passed {
            self.payload_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn add_schemas_loaded(&self, count: u64) {
        self.schemas_loaded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            presence_checks: self.presence_checks.load(Ordering::Relaxed),
            presence_failures: self.presence_failures.load(Ordering::Relaxed),
            payload_checks: self.payload_checks.load(Ordering::Relaxed),
            payload_failures: self.payload_failures.load(Ordering::Relaxed),
            schemas_loaded: self.schemas_loaded.load(Ordering::Relaxed),
        }
    }

    /// Serialize the current counters as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}
