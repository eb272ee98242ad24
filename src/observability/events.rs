//! Observable guard events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in aeroguard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Guard configuration loaded
    ConfigLoaded,
    /// Route schema file loaded
    SchemaLoaded,
    /// Route schema file rejected
    SchemaRejected,

    // Presence checks
    /// Every declared key present
    PresencePassed,
    /// At least one declared key missing
    PresenceMissing,

    // Payload validation
    /// Payload matched its typed schema
    PayloadPassed,
    /// Payload failed its typed schema
    PayloadRejected,

    /// Request named a route with no registered schema
    UnknownRoute,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::PresencePassed => "PRESENCE_PASSED",
            Event::PresenceMissing => "PRESENCE_MISSING",
            Event::PayloadPassed => "PAYLOAD_PASSED",
            Event::PayloadRejected => "PAYLOAD_REJECTED",
            Event::UnknownRoute => "UNKNOWN_ROUTE",
        }
    }

    /// Returns true if the event reports a broken configuration
    pub fn is_error(&self) -> bool {
        matches!(self, Event::SchemaRejected | Event::UnknownRoute)
    }

    /// Returns true if the event reports a rejected request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::PresenceMissing | Event::PayloadRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
