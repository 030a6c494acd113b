//! Configuration file loading and value resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (handled by clap's `env` attribute)
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Contents of `config.toml`
///
/// ```toml
/// [catalog]
/// port = 8080
/// database_path = "/var/lib/bands/bands.db"
///
/// [grammy]
/// port = 8081
/// catalog_url = "http://127.0.0.1:8080/grammy/band"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub catalog: CatalogSection,
    pub grammy: GrammySection,
}

/// `[catalog]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
}

/// `[grammy]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GrammySection {
    pub port: Option<u16>,
    pub catalog_url: Option<String>,
}

/// Pick the first configured value, falling back to the compiled default
pub fn resolve<T>(cli_or_env: Option<T>, file: Option<T>, default: impl FnOnce() -> T) -> T {
    cli_or_env.or(file).unwrap_or_else(default)
}

/// Find the config file to read
///
/// An explicit path wins. Otherwise `~/.config/bands/config.toml`, then
/// `/etc/bands/config.toml` on Linux.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let user_config = dirs::config_dir().map(|d| d.join("bands").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/bands/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load the config file
///
/// A missing file is not an error: defaults apply. A file that exists but
/// cannot be read or parsed is reported, since silently ignoring it would
/// hide typos.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let Some(path) = locate_config_file(explicit) else {
        debug!("No config file found, using defaults");
        return Ok(ConfigFile::default());
    };

    if !path.exists() {
        warn!("Config file {} does not exist, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Parse TOML config text
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

/// Get OS-dependent default database path
pub fn default_database_path() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/bands/bands.db (or /var/lib/bands for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("bands"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/bands"))
            .join("bands.db")
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("bands"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/bands"))
            .join("bands.db")
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("bands"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\bands"))
            .join("bands.db")
    } else {
        PathBuf::from("./bands_data/bands.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_priority() {
        assert_eq!(resolve(Some(1), Some(2), || 3), 1);
        assert_eq!(resolve(None, Some(2), || 3), 2);
        assert_eq!(resolve(None::<u16>, None, || 3), 3);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("[grammy]\nport = 9000\n").unwrap();
        assert_eq!(config.grammy.port, Some(9000));
        assert!(config.grammy.catalog_url.is_none());
        assert!(config.catalog.port.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let result = parse_config("[catalog]\nport = \"eighty\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_default_database_path_is_file() {
        let path = default_database_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("bands.db"));
    }
}
