use clap::Args;

use stash_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Gateway server port
    #[arg(long, default_value_t = 9090)]
    pub gateway_port: u16,

    /// Public gateway URL used in share and preview links
    #[arg(long)]
    pub gateway_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            gateway_port: self.gateway_port,
            gateway_url: self.gateway_url.clone(),
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized stash directory at: {}\n\
             - Uploads: {}\n\
             - Shares: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Gateway port: {}\n\
             - Gateway URL: {}",
            state.stash_dir.display(),
            state.uploads_path.display(),
            state.shares_path.display(),
            state.config_path.display(),
            state.config.api_port,
            state.config.gateway_port,
            state
                .config
                .gateway_url
                .as_deref()
                .unwrap_or("(default: localhost)"),
        );

        Ok(output)
    }
}
