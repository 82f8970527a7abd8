//! Client configuration

use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No local data directory on this platform; pass --data-dir")]
    NoDataDir,
}

/// Settings shared by every command. Each flag can also come from the
/// environment or a `.env` file.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Backend base URL
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Directory holding the persisted session and cart
    #[arg(long, env = "STOREFRONT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Capacity of each service mailbox
    #[arg(long, default_value_t = 100)]
    pub mailbox_size: usize,
}

impl ClientConfig {
    /// The configured data directory, or `<local data dir>/storefront`.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs_next::data_local_dir()
                .map(|dir| dir.join("storefront"))
                .ok_or(ConfigError::NoDataDir),
        }
    }
}
