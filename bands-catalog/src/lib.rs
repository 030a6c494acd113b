//! bands-catalog library - music band catalog service
//!
//! XML over HTTP: CRUD on bands, paginated criteria and name searches,
//! singles counts, and the two mutations the grammy gateway forwards.

use axum::{middleware, Router};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod service;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    let bands = Router::new()
        .route("/bands", post(api::create_band))
        .route("/bands/filters", post(api::search_bands))
        .route("/bands/search-by-name", post(api::search_by_name))
        .route("/bands/singles/equally/:singles_count", get(api::count_singles_equal))
        .route("/bands/singles/greater/:singles_count", get(api::count_singles_greater))
        .route(
            "/bands/:id",
            get(api::get_band).put(api::update_band).delete(api::delete_band),
        );

    let grammy = Router::new()
        .route("/grammy/band/:id/singles/add", post(api::add_single))
        .route("/grammy/band/:id/participants/remove", delete(api::remove_participant));

    Router::new()
        .merge(bands)
        .merge(grammy)
        .merge(api::health_routes())
        .layer(middleware::from_fn(bands_common::envelope::stamp_error_path))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
