use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// File or folder to delete (folders are removed recursively)
    #[arg(long)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<DeleteRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let path = RelativePath::parse(&req.path)?;

    state.tree().remove(&identity, &path).await?;

    Ok((
        http::StatusCode::OK,
        Json(DeleteResponse {
            path: path.to_string(),
        }),
    )
        .into_response())
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/delete")?;
        Ok(client.post(full_url).json(&self))
    }
}
