//! Database access layer for bands-catalog
//!
//! SQLite through an sqlx pool. The schema is a single `music_band` table
//! created idempotently at startup; its CHECK constraints repeat the model
//! invariants so a bad write fails loudly even if a caller skips
//! validation.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub mod bands;

/// Open (creating if needed) the database file and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// The pool never recycles its connection, since that would discard the
/// in-memory data.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    create_schema(&pool).await?;
    Ok(pool)
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS music_band (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            coordinate_x INTEGER NOT NULL,
            coordinate_y INTEGER NOT NULL DEFAULT 0,
            creation_date TEXT NOT NULL,
            number_of_participants INTEGER NOT NULL CHECK (number_of_participants >= 1),
            singles_count INTEGER CHECK (singles_count IS NULL OR singles_count >= 1),
            albums_count INTEGER CHECK (albums_count IS NULL OR albums_count >= 1),
            genre TEXT NOT NULL CHECK (genre IN ('PROGRESSIVE_ROCK', 'HIP_HOP', 'PUNK_ROCK')),
            label_sales INTEGER CHECK (label_sales IS NULL OR label_sales >= 1)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create music_band table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_music_band_singles ON music_band(singles_count)")
        .execute(pool)
        .await
        .context("Failed to create singles_count index")?;

    Ok(())
}
