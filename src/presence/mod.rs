//! Presence checking for request parameters and bodies
//!
//! Only asks whether declared keys exist, never what type they are. Use
//! `schema` for typed validation.

mod checker;
mod types;

pub use checker::{is_valid, Location, MissingKey, PresenceChecker, PresenceMode, PresenceReport};
pub use types::{PresenceNode, PresenceRule, PresenceSchema};
