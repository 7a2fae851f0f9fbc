use axum::extract::{Json, State};
use axum::response::IntoResponse;
use axum::Extension;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::PreviewApiError;
use crate::http_server::api::client::ApiRequest;
use crate::http_server::Config;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// HTML document to host
    pub content: String,
    /// Base URL relative links in the document resolve against
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub token: String,
    pub url: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, PreviewApiError> {
    let record = state.previews().create(req.content, &req.base_url)?;
    tracing::info!(base_url = %record.base_url, "preview created");

    Ok((
        http::StatusCode::OK,
        Json(CreateResponse {
            url: config.preview_url(&record.token),
            token: record.token,
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
        let full_url = base_url.join("/api/v0/preview/create")?;
        Ok(client.post(full_url).json(&self))
    }
}
