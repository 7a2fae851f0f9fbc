use std::path::PathBuf;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // storage configuration
    /// Root folder holding one subfolder per identity
    pub storage_root: PathBuf,
    /// File backing the share registry
    pub shares_path: PathBuf,
    /// Upper bound on files in one upload request
    pub max_upload_files: usize,

    // http server configuration - separate ports for API and gateway
    /// Port for the API HTTP server (private, mutation/RPC).
    pub api_port: u16,
    /// Port for the gateway HTTP server (public, read-only).
    pub gateway_port: u16,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,

    // url configuration
    /// External gateway URL (e.g., "https://files.example.com")
    /// Used for generating share and preview links
    pub gateway_url: Option<String>,
}

impl Config {
    /// Base URL share and preview links are built on.
    pub fn public_url(&self) -> Result<Url, ConfigError> {
        match &self.gateway_url {
            Some(url) => Ok(Url::parse(url)?),
            None => Ok(Url::parse(&format!(
                "http://localhost:{}",
                self.gateway_port
            ))?),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid gateway url: {0}")]
    Url(#[from] url::ParseError),
}
