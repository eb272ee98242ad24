//! Guard HTTP Routes
//!
//! Exposes the guard's validation counters.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::observability::ValidationMetrics;

/// Create the metrics route
pub fn metrics_routes(metrics: Arc<ValidationMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Metrics handler - returns the counters as JSON
async fn metrics_handler(State(metrics): State<Arc<ValidationMetrics>>) -> impl IntoResponse {
    (StatusCode::OK, Json(metrics.to_json()))
}
