use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::prelude::MAX_UPLOAD_FILES;

pub const APP_NAME: &str = "stash";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const UPLOADS_DIR_NAME: &str = "uploads";
pub const SHARES_FILE_NAME: &str = "shares.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server (private, mutations)
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Port for the gateway server (public, share + preview links)
    #[serde(default = "default_gateway_port")]
    pub gateway_port: u16,
    /// Public base URL of the gateway, used when building share links
    #[serde(default)]
    pub gateway_url: Option<String>,
    /// Maximum files accepted in one upload request
    #[serde(default = "default_max_upload_files")]
    pub max_upload_files: usize,
}

fn default_api_port() -> u16 {
    5001
}

fn default_gateway_port() -> u16 {
    9090
}

fn default_max_upload_files() -> usize {
    MAX_UPLOAD_FILES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            gateway_port: default_gateway_port(),
            gateway_url: None,
            max_upload_files: default_max_upload_files(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the stash directory (~/.stash)
    pub stash_dir: PathBuf,
    /// Storage root holding one folder per identity
    pub uploads_path: PathBuf,
    /// Share registry file
    pub shares_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the stash directory path (custom or default ~/.stash)
    pub fn stash_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new stash state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;

        if stash_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&stash_dir)?;

        let uploads_path = stash_dir.join(UPLOADS_DIR_NAME);
        fs::create_dir_all(&uploads_path)?;

        let config = config.unwrap_or_default();
        let config_path = stash_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        Ok(Self {
            shares_path: stash_dir.join(SHARES_FILE_NAME),
            stash_dir,
            uploads_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the stash directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;

        if !stash_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let uploads_path = stash_dir.join(UPLOADS_DIR_NAME);
        let shares_path = stash_dir.join(SHARES_FILE_NAME);
        let config_path = stash_dir.join(CONFIG_FILE_NAME);

        if !uploads_path.exists() {
            return Err(StateError::MissingFile(format!("{}/", UPLOADS_DIR_NAME)));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            stash_dir,
            uploads_path,
            shares_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("stash directory not initialized. Run 'stash init' first")]
    NotInitialized,

    #[error("stash directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
