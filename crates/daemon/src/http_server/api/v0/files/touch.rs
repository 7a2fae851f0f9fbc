use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, RelativePath};

use super::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct TouchRequest {
    /// Identity owning the namespace
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Folder to create the file in (defaults to the namespace root)
    #[arg(long, default_value = "")]
    #[serde(default)]
    pub folder: String,

    /// File name without extension
    #[arg(long)]
    pub name: String,

    /// Extension, with or without the leading dot
    #[arg(long, default_value = "")]
    #[serde(default)]
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchResponse {
    pub path: String,
    pub filename: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<TouchRequest>,
) -> Result<impl IntoResponse, FilesError> {
    let identity = Identity::parse(&req.email)?;
    let folder = RelativePath::parse(&req.folder)?;

    let path = state
        .tree()
        .create_file(&identity, &folder, &req.name, &req.extension)
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(TouchResponse {
            filename: path.file_name().unwrap_or_default().to_string(),
            path: path.to_string(),
        }),
    )
        .into_response())
}

impl ApiRequest for TouchRequest {
    type Response = TouchResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/files/touch")?;
        Ok(client.post(full_url).json(&self))
    }
}
