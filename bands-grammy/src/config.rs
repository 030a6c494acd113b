//! Startup configuration for bands-grammy

use bands_common::config::{load_config_file, resolve};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8080/grammy/band";

/// Grammy gateway forwarding band mutations to the catalog
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bands-grammy", version, about)]
pub struct GrammyArgs {
    /// HTTP listen port
    #[arg(short, long, env = "BANDS_GRAMMY_PORT")]
    pub port: Option<u16>,

    /// Base URL of the catalog's grammy endpoints
    #[arg(long, env = "BANDS_CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "BANDS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammyConfig {
    pub port: u16,
    pub catalog_url: String,
}

impl GrammyConfig {
    pub fn resolve(args: GrammyArgs) -> bands_common::Result<Self> {
        let file = load_config_file(args.config.as_deref())?.grammy;

        Ok(Self {
            port: resolve(args.port, file.port, || DEFAULT_PORT),
            catalog_url: resolve(args.catalog_url, file.catalog_url, || {
                DEFAULT_CATALOG_URL.to_string()
            }),
        })
    }
}
