//! Health check endpoint

use axum::{routing::get, Json, Router};
use bands_common::health::HealthResponse;

use crate::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    HealthResponse::ok(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
