//! Startup configuration for bands-catalog

use bands_common::config::{default_database_path, load_config_file, resolve};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;

/// Music band catalog service
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bands-catalog", version, about)]
pub struct CatalogArgs {
    /// HTTP listen port
    #[arg(short, long, env = "BANDS_CATALOG_PORT")]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "BANDS_DB_PATH")]
    pub database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "BANDS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub port: u16,
    pub database_path: PathBuf,
}

impl CatalogConfig {
    /// Merge arguments (or their env fallbacks) over the config file
    pub fn resolve(args: CatalogArgs) -> bands_common::Result<Self> {
        let file = load_config_file(args.config.as_deref())?.catalog;

        Ok(Self {
            port: resolve(args.port, file.port, || DEFAULT_PORT),
            database_path: resolve(args.database, file.database_path, default_database_path),
        })
    }
}
