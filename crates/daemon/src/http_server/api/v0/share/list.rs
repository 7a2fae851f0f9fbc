use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Identity;

use super::info::ShareInfo;
use super::ShareApiError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {
    /// Identity whose shares to list
    #[arg(long)]
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub shares: Vec<ShareInfo>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ListRequest>,
) -> Result<impl IntoResponse, ShareApiError> {
    let owner = Identity::parse(&req.email)?;
    let shares = state
        .shares()
        .list_for(&owner)
        .await
        .into_iter()
        .map(ShareInfo::from)
        .collect();

    Ok((http::StatusCode::OK, Json(ListResponse { shares })).into_response())
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/v0/share/list")?;
        Ok(client.post(full_url).json(&self))
    }
}
