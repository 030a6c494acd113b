//! HTTP API handlers for bands-grammy

pub mod band;
pub mod health;

pub use band::{add_single, remove_participant};
pub use health::health_routes;
