//! bands-grammy library - gateway forwarding band mutations to the catalog

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod client;
pub mod config;
pub mod error;

use client::CatalogClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub client: CatalogClient,
}

impl AppState {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, post};

    Router::new()
        .route("/grammy/band/:id/singles/add", post(api::add_single))
        .route("/grammy/band/:id/participants/remove", delete(api::remove_participant))
        .merge(api::health_routes())
        .layer(middleware::from_fn(bands_common::envelope::stamp_error_path))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
