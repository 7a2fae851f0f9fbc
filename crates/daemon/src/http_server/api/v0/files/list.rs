use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath, StorageEntry};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Folder to list (defaults to the namespace root)
    #[arg(long, default_value = "")]
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub folder: String,
    pub files: Vec<StorageEntry>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ListRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let folder = RelativePath::parse(&req.folder)?;

    let files = state.tree().list(&identity, &folder).await?;

    Ok((
        http::StatusCode::OK,
        Json(ListResponse {
            folder: folder.to_string(),
            files,
        }),
    )
        .into_response())
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/list")?;
        Ok(client.post(full_url).json(&self))
    }
}
