use std::path::PathBuf;

use clap::Args;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::files::DownloadRequest;

#[derive(Args, Debug, Clone)]
pub struct Download {
    #[command(flatten)]
    pub request: DownloadRequest,

    /// Where to write the file (defaults to the file name in the current directory)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Download {
    type Error = DownloadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client.clone();

        let url = client
            .base_url()
            .join("/api/v0/files/download")
            .map_err(ApiError::from)?;
        let response = client
            .http_client()
            .get(url)
            .query(&self.request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await.into());
        }

        let out = match &self.out {
            Some(out) => out.clone(),
            None => PathBuf::from(
                self.request
                    .path
                    .rsplit('/')
                    .next()
                    .filter(|name| !name.is_empty())
                    .unwrap_or("download"),
            ),
        };

        let mut file = tokio::fs::File::create(&out).await?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(format!("Downloaded {} bytes to {}", written, out.display()))
    }
}
