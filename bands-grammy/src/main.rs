//! bands-grammy - gateway forwarding band mutations to the catalog

use anyhow::{Context, Result};
use bands_common::shutdown::shutdown_signal;
use bands_grammy::client::CatalogClient;
use bands_grammy::config::{GrammyArgs, GrammyConfig};
use bands_grammy::{build_router, AppState};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        "Starting bands-grammy v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = GrammyConfig::resolve(GrammyArgs::parse())
        .context("Failed to load configuration")?;
    info!("Forwarding to catalog at {}", config.catalog_url);

    let client = CatalogClient::new(config.catalog_url.as_str())
        .context("Failed to build catalog client")?;
    let app = build_router(AppState::new(client));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("bands-grammy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("bands-grammy stopped");
    Ok(())
}
