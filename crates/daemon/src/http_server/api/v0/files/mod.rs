use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use common::prelude::{ErrorKind, NamespaceError, StorageError};

use crate::http_server::handlers::error_response;
use crate::ServiceState;

pub mod cat;
pub mod delete;
pub mod download;
pub mod list;
pub mod mkdir;
pub mod rename;
pub mod save;
pub mod touch;
pub mod upload;

pub use cat::CatRequest;
pub use delete::DeleteRequest;
pub use download::DownloadRequest;
pub use list::ListRequest;
pub use mkdir::MkdirRequest;
pub use rename::RenameRequest;
pub use save::SaveRequest;
pub use touch::TouchRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/upload", post(upload::handler))
        .route("/list", post(list::handler))
        .route("/mkdir", post(mkdir::handler))
        .route("/touch", post(touch::handler))
        .route("/cat", post(cat::handler))
        .route("/save", post(save::handler))
        .route("/rename", post(rename::handler))
        .route("/delete", post(delete::handler))
        .route("/download", get(download::handler))
        .with_state(state)
}

/// Failure of a single-file operation in a namespace.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl FilesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilesError::Namespace(e) => e.kind(),
            FilesError::Storage(e) => e.kind(),
            FilesError::Response(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for FilesError {
    fn into_response(self) -> Response {
        error_response(self.kind(), &self)
    }
}
