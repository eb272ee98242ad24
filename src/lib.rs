//! aeroguard - A strict, deterministic request-payload validator
//!
//! Two independent validators guard request handlers:
//! - `presence`: required keys in path parameters and bodies
//! - `schema`: typed fields, custom validators, undeclared-key rejection
//!
//! `http_server` applies their outcomes to HTTP exchanges.

pub mod http_server;
pub mod observability;
pub mod presence;
pub mod schema;
pub mod value;
