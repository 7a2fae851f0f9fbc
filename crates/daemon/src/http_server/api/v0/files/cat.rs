use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CatRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Path of the file to read
    #[arg(long)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatResponse {
    pub path: String,
    /// UTF-8 file content
    pub content: String,
    pub size: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CatRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let path = RelativePath::parse(&req.path)?;

    let content = state.tree().read_text(&identity, &path).await?;

    Ok((
        http::StatusCode::OK,
        Json(CatResponse {
            path: path.to_string(),
            size: content.len(),
            content,
        }),
    )
        .into_response())
}

impl ApiRequest for CatRequest {
    type Response = CatResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/cat")?;
        Ok(client.post(full_url).json(&self))
    }
}
