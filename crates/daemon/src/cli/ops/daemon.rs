use clap::Args;

use stash_daemon::state::AppState;
use stash_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Override gateway server port (default from config)
    #[arg(long)]
    pub gateway_port: Option<u16>,

    /// Gateway URL for share and preview links (e.g., https://files.example.com)
    #[arg(long)]
    pub gateway_url: Option<String>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] stash_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let config = ServiceConfig {
            storage_root: state.uploads_path,
            shares_path: state.shares_path,
            max_upload_files: state.config.max_upload_files,
            api_port: self.api_port.unwrap_or(state.config.api_port),
            gateway_port: self.gateway_port.unwrap_or(state.config.gateway_port),
            log_level: if self.verbose {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            },
            log_dir: self.log_dir.clone(),
            gateway_url: self.gateway_url.clone().or(state.config.gateway_url),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
