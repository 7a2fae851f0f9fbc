use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct MkdirRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Parent folder (defaults to the namespace root)
    #[arg(long, default_value = "")]
    #[serde(default)]
    pub folder: String,

    /// Name of the folder to create
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MkdirResponse {
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<MkdirRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let parent = RelativePath::parse(&req.folder)?;

    let path = state
        .tree()
        .create_folder(&identity, &parent, &req.name)
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(MkdirResponse {
            path: path.to_string(),
        }),
    )
        .into_response())
}

impl ApiRequest for MkdirRequest {
    type Response = MkdirResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/mkdir")?;
        Ok(client.post(full_url).json(&self))
    }
}
