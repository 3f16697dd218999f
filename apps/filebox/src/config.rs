//! Filebox Configuration Settings
//!
//! Configuration for the file-reading server, loaded from environment
//! variables.

use std::path::PathBuf;

/// Default HTTP server port.
const DEFAULT_PORT: u16 = 4000;

/// Default base directory for served files, relative to the working dir.
const DEFAULT_BASE_DIR: &str = "files";

/// Complete filebox configuration.
#[derive(Debug, Clone)]
pub struct FileboxConfig {
    /// HTTP server port.
    pub port: u16,
    /// Base directory that served files must live under.
    pub base_dir: PathBuf,
}

impl FileboxConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `FILEBOX_PORT` (default 4000) and `FILEBOX_BASE_DIR`
    /// (default `./files`). The base directory is created if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory cannot be created.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_env_u16("FILEBOX_PORT", DEFAULT_PORT);

        let base_dir = std::env::var("FILEBOX_BASE_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_BASE_DIR), PathBuf::from);

        std::fs::create_dir_all(&base_dir)
            .map_err(|e| ConfigError::BaseDirUnavailable(base_dir.clone(), e.to_string()))?;

        Ok(Self { port, base_dir })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base directory could not be created.
    #[error("base directory {0:?} could not be created: {1}")]
    BaseDirUnavailable(PathBuf, String),
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
