use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RenameRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Current path of the file or folder
    #[arg(long)]
    pub path: String,

    /// New name, kept in the same folder
    #[arg(long)]
    pub new_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameResponse {
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RenameRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let path = RelativePath::parse(&req.path)?;

    let renamed = state
        .tree()
        .rename(&identity, &path, &req.new_name)
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(RenameResponse {
            path: renamed.to_string(),
        }),
    )
        .into_response())
}

impl ApiRequest for RenameRequest {
    type Response = RenameResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/rename")?;
        Ok(client.post(full_url).json(&self))
    }
}
