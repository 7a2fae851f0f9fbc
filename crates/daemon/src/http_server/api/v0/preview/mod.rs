use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use common::prelude::PreviewError;

use crate::http_server::handlers::error_response;
use crate::ServiceState;

pub mod create;

pub use create::CreateRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/create", post(create::handler))
        .with_state(state)
}

impl IntoResponse for PreviewApiError {
    fn into_response(self) -> Response {
        error_response(self.0.kind(), &self.0)
    }
}

/// Wrapper so a store error can be returned from a handler.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct PreviewApiError(#[from] PreviewError);
