//! Request guard
//!
//! Validation itself is pure. This layer applies the side effects: it sends
//! the rejection status through an injected [`StatusSink`], logs the outcome
//! and counts it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Map, Value};

use super::config::GuardConfig;
use super::errors::{GuardError, GuardResult};
use crate::observability::{log_event_with_fields, Event, Logger, ValidationMetrics};
use crate::presence::{PresenceChecker, PresenceReport, PresenceSchema};
use crate::schema::{RouteSchema, SchemaError, SchemaLoader, SchemaValidator, ValidationResult};

/// Anything exposing parsed path parameters and body
pub trait RequestLike {
    fn params(&self) -> Option<&Value>;
    fn body(&self) -> Option<&Value>;
}

/// Capability to end an exchange with a status code
pub trait StatusSink {
    fn send_status(&mut self, status: StatusCode);
}

impl StatusSink for Response {
    fn send_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }
}

/// Status sink that remembers what was sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordedStatus {
    status: Option<StatusCode>,
}

impl RecordedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl StatusSink for RecordedStatus {
    fn send_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }
}

/// Parsed request data handed to the guard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPayload {
    pub params: Option<Value>,
    pub body: Option<Value>,
}

impl RequestPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path parameters as extracted by the router, all strings
    pub fn from_path_params(params: HashMap<String, String>) -> Self {
        let params: Map<String, Value> = params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Self {
            params: Some(Value::Object(params)),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl RequestLike for RequestPayload {
    fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Checks presence and sends `400 Bad Request` on failure.
///
/// Returns whether every declared key was present.
pub fn is_valid<R, S>(schema: &PresenceSchema, request: &R, response: &mut S) -> bool
where
    R: RequestLike + ?Sized,
    S: StatusSink + ?Sized,
{
    let report = PresenceChecker::new().check(schema, request.params(), request.body());
    if !report.is_valid() {
        response.send_status(StatusCode::BAD_REQUEST);
    }
    report.is_valid()
}

/// Runs route schemas against requests and turns failures into rejections.
pub struct RequestGuard {
    config: GuardConfig,
    reject_status: StatusCode,
    loader: SchemaLoader,
    checker: PresenceChecker,
    validator: SchemaValidator,
    metrics: Arc<ValidationMetrics>,
}

impl RequestGuard {
    /// Build a guard, loading route schemas from `config.schema_dir` if set.
    pub fn new(config: GuardConfig) -> GuardResult<Self> {
        let dir = config.schema_dir.as_deref().unwrap_or(Path::new("."));
        let mut loader = SchemaLoader::new(dir);
        if config.schema_dir.is_some() {
            loader.load_all()?;
        }
        Self::with_loader(config, loader)
    }

    /// Build a guard around an already populated loader.
    pub fn with_loader(config: GuardConfig, loader: SchemaLoader) -> GuardResult<Self> {
        let reject_status = config
            .reject_status_code()
            .map_err(|reason| SchemaError::malformed_schema("guard config", reason))?;

        Logger::set_min_severity(config.log_level);

        let metrics = Arc::new(ValidationMetrics::new());
        metrics.add_schemas_loaded(loader.schema_count() as u64);

        let count = loader.schema_count().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("schemas", count.as_str())]);

        Ok(Self {
            checker: PresenceChecker::with_mode(config.presence_mode),
            validator: SchemaValidator::with_options(config.validator_options()),
            config,
            reject_status,
            loader,
            metrics,
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<ValidationMetrics> {
        &self.metrics
    }

    /// Register a route schema after construction.
    pub fn register(&mut self, schema: RouteSchema) -> GuardResult<()> {
        self.loader.register(schema)?;
        self.metrics.add_schemas_loaded(1);
        Ok(())
    }

    fn route(&self, name: &str) -> GuardResult<&RouteSchema> {
        self.loader.require(name).map_err(|e| {
            log_event_with_fields(Event::UnknownRoute, &[("route", name)]);
            GuardError::from(e)
        })
    }

    /// Check declared keys of a route against a request.
    pub fn check_presence<R>(&self, route: &str, request: &R) -> GuardResult<PresenceReport>
    where
        R: RequestLike + ?Sized,
    {
        let schema = self.route(route)?;
        let Some(presence) = &schema.presence else {
            return Ok(PresenceReport::default());
        };

        let report = self.checker.check(presence, request.params(), request.body());
        self.metrics.record_presence(report.is_valid());

        match report.message() {
            None => {
                log_event_with_fields(Event::PresencePassed, &[("route", route)]);
                Ok(report)
            }
            Some(message) => {
                log_event_with_fields(
                    Event::PresenceMissing,
                    &[("route", route), ("missing", message.as_str())],
                );
                Err(self.redact(GuardError::MissingKeys {
                    status: self.reject_status,
                    messages: report.lines(),
                }))
            }
        }
    }

    /// Validate a body against a route's typed fields.
    pub fn check_payload(&self, route: &str, body: &Value) -> GuardResult<ValidationResult> {
        let schema = self.route(route)?;
        let Some(fields) = &schema.fields else {
            return Ok(ValidationResult {
                pass: true,
                messages: Vec::new(),
            });
        };

        let result = self.validator.validate(body, fields);
        self.metrics.record_payload(result.pass);

        if result.pass {
            log_event_with_fields(Event::PayloadPassed, &[("route", route)]);
            return Ok(result);
        }

        let joined = result.messages.join("; ");
        log_event_with_fields(
            Event::PayloadRejected,
            &[("route", route), ("messages", joined.as_str())],
        );
        Err(self.redact(GuardError::InvalidPayload {
            status: self.reject_status,
            messages: result.messages,
        }))
    }

    /// Presence first, then the typed body check.
    pub fn check<R>(&self, route: &str, request: &R) -> GuardResult<()>
    where
        R: RequestLike + ?Sized,
    {
        self.check_presence(route, request)?;

        let empty = Value::Object(Map::new());
        self.check_payload(route, request.body().unwrap_or(&empty))?;
        Ok(())
    }

    fn redact(&self, err: GuardError) -> GuardError {
        if self.config.expose_messages {
            err
        } else {
            err.without_messages()
        }
    }
}
