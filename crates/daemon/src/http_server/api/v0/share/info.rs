use std::collections::BTreeSet;

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Identity, Permission, RelativePath, ShareError, ShareRecord};

use super::ShareApiError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct InfoRequest {
    /// Share token
    pub token: String,
}

/// Public view of a share. Expired shares are still described until purged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareInfo {
    pub token: String,
    pub owner: Identity,
    pub files: BTreeSet<RelativePath>,
    pub folders: BTreeSet<RelativePath>,
    pub permission: Permission,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub live: bool,
}

impl From<ShareRecord> for ShareInfo {
    fn from(record: ShareRecord) -> Self {
        Self {
            live: record.is_live(),
            token: record.token,
            owner: record.owner,
            files: record.files,
            folders: record.folders,
            permission: record.permission,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<InfoRequest>,
) -> Result<impl IntoResponse, ShareApiError> {
    let record = state
        .shares()
        .lookup(&req.token)
        .await
        .ok_or(ShareError::NotFound)?;

    Ok((http::StatusCode::OK, Json(ShareInfo::from(record))).into_response())
}

impl ApiRequest for InfoRequest {
    type Response = ShareInfo;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/share/info")?;
        Ok(client.post(full_url).json(&self))
    }
}
