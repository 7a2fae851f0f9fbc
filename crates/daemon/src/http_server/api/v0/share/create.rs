use axum::extract::{Json, State};
use axum::response::IntoResponse;
use axum::Extension;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, Permission, RelativePath};

use super::ShareApiError;
use crate::http_server::api::client::ApiRequest;
use crate::http_server::Config;
use crate::ServiceState;

fn default_permission() -> Permission {
    Permission::Read
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Identity owning the shared files
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// File to share (repeatable)
    #[arg(long = "file")]
    #[serde(default)]
    pub files: Vec<String>,

    /// Folder whose whole subtree is shared (repeatable)
    #[arg(long = "folder")]
    #[serde(default)]
    pub folders: Vec<String>,

    /// read (inline) or download (attachment)
    #[arg(long, default_value = "read")]
    #[serde(default = "default_permission")]
    pub permission: Permission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub token: String,
    pub url: String,
    pub permission: Permission,
    pub expires_at: DateTime<Utc>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, ShareApiError> {
    let owner = Identity::parse(&req.email)?;
    let files = req
        .files
        .iter()
        .map(|raw| RelativePath::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let folders = req
        .folders
        .iter()
        .map(|raw| RelativePath::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let record = state
        .shares()
        .create(&owner, files, folders, req.permission)
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(CreateResponse {
            url: config.share_url(&record.token),
            token: record.token,
            permission: record.permission,
            expires_at: record.expires_at,
        }),
    )
        .into_response())
}

impl ApiRequest for CreateRequest {
    type Response = CreateResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/share/create")?;
        Ok(client.post(full_url).json(&self))
    }
}
