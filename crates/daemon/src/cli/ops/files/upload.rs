use std::path::PathBuf;

use clap::Args;
use reqwest::multipart;

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::files::upload::UploadResponse;

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Identity owning the namespace
    #[arg(long)]
    pub email: String,

    /// Destination folder (defaults to the namespace root)
    #[arg(long, default_value = "")]
    pub folder: String,

    /// Local files to upload
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client.clone();

        let mut form = multipart::Form::new()
            .text("email", self.email.clone())
            .text("folder", self.folder.clone());

        for path in &self.paths {
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| UploadError::Read(path.clone(), e))?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            form = form.part("files", multipart::Part::bytes(data).file_name(filename));
        }

        let url = client
            .base_url()
            .join("/api/v0/files/upload")
            .map_err(ApiError::from)?;
        let response = client
            .http_client()
            .post(url)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await.into());
        }

        let response: UploadResponse = response.json().await?;
        let mut lines = vec![format!("Uploaded {} file(s):", response.files.len())];
        lines.extend(response.files.iter().map(|name| format!("  {}", name)));
        Ok(lines.join("\n"))
    }
}
