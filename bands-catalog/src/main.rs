//! bands-catalog - music band catalog service

use anyhow::{Context, Result};
use bands_catalog::config::{CatalogArgs, CatalogConfig};
use bands_catalog::{build_router, db, AppState};
use bands_common::shutdown::shutdown_signal;
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
        "Starting bands-catalog v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = CatalogConfig::resolve(CatalogArgs::parse())
        .context("Failed to load configuration")?;
    info!("Database path: {}", config.database_path.display());

    let pool = db::init_database(&config.database_path).await?;
    let app = build_router(AppState::new(pool.clone()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("bands-catalog listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("bands-catalog stopped");
    Ok(())
}
