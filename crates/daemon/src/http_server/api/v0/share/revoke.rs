use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Identity;

use super::ShareApiError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RevokeRequest {
    /// Identity that created the share
    #[arg(long)]
    #[serde(default)]
    pub email: String,

    /// Token to revoke
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeResponse {
    pub token: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RevokeRequest>,
) -> Result<impl IntoResponse, ShareApiError> {
    let owner = Identity::parse(&req.email)?;
    let record = state.shares().revoke(&owner, &req.token).await?;

    Ok((
        http::StatusCode::OK,
        Json(RevokeResponse {
            token: record.token,
        }),
    )
        .into_response())
}

impl ApiRequest for RevokeRequest {
    type Response = RevokeResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/share/revoke")?;
        Ok(client.post(full_url).json(&self))
    }
}
