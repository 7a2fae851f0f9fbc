use std::path::PathBuf;

use clap::{Args, Subcommand};

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::preview::CreateRequest;

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Create, Create),
}

pub type PreviewCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Preview {
    #[command(subcommand)]
    pub command: PreviewCommand,
}

#[async_trait::async_trait]
impl Op for Preview {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Base URL relative links in the document resolve against
    #[arg(long)]
    pub base_url: String,

    /// HTML file to host
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = CreateError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let content = tokio::fs::read_to_string(&self.file)
            .await
            .map_err(|e| CreateError::Read(self.file.clone(), e))?;

        let mut client = ctx.client.clone();
        let response = client
            .call(CreateRequest {
                content,
                base_url: self.base_url.clone(),
            })
            .await?;
        Ok(format!(
            "Preview hosted at {} (expires in 10 minutes)",
            response.url
        ))
    }
}
