use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct SaveRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Path of the file to write
    #[arg(long)]
    pub path: String,

    /// New content, replacing whatever is there
    #[arg(long)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub path: String,
    pub size: u64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SaveRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let path = RelativePath::parse(&req.path)?;

    let size = state
        .tree()
        .write_content(&identity, &path, req.content.as_bytes())
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(SaveResponse {
            path: path.to_string(),
            size,
        }),
    )
        .into_response())
}

impl ApiRequest for SaveRequest {
    type Response = SaveResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/save")?;
        Ok(client.post(full_url).json(&self))
    }
}
