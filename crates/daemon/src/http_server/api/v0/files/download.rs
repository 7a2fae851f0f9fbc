use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::handlers::{file_response, Disposition};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DownloadRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// File to download
    #[arg(long)]
    pub path: String,
}

/// Stream a file from the caller's own namespace as an attachment.
pub async fn handler(
    State(state): State<ServiceState>,
    Query(req): Query<DownloadRequest>,
) -> Result<Response, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let path = RelativePath::parse(&req.path)?;

    let download = state.tree().download(&identity, &path).await?;
    tracing::debug!(identity = %identity, path = %path, size = download.size, "download");

    Ok(file_response(download, Disposition::Attachment)?)
}
