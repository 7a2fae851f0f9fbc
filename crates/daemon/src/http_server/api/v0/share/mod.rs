use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use common::prelude::{ErrorKind, NamespaceError, ShareError};

use crate::http_server::handlers::error_response;
use crate::ServiceState;

pub mod create;
pub mod info;
pub mod list;
pub mod revoke;

pub use create::CreateRequest;
pub use info::InfoRequest;
pub use list::ListRequest;
pub use revoke::RevokeRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/create", post(create::handler))
        .route("/info", post(info::handler))
        .route("/list", post(list::handler))
        .route("/revoke", post(revoke::handler))
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ShareApiError {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error(transparent)]
    Share(#[from] ShareError),
}

impl ShareApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShareApiError::Namespace(e) => e.kind(),
            ShareApiError::Share(e) => e.kind(),
        }
    }
}

impl IntoResponse for ShareApiError {
    fn into_response(self) -> Response {
        error_response(self.kind(), &self)
    }
}
