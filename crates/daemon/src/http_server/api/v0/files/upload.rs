use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use common::prelude::{
    ErrorKind, Identity, NamespaceError, RelativePath, StorageError, UploadFile,
};

use crate::http_server::handlers::error_response;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub folder: String,
    /// Names the files were stored under, in upload order
    pub files: Vec<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    let max_files = state.max_upload_files();
    let mut email: Option<String> = None;
    let mut folder = String::new();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("multipart parsing error: {}", e);
        UploadError::Multipart(e.to_string())
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "email" => {
                email = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| UploadError::Multipart(e.to_string()))?,
                );
            }
            "folder" => {
                folder = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
            }
            "file" | "files" => {
                if files.len() >= max_files {
                    return Err(UploadError::InvalidRequest(format!(
                        "too many files (max {})",
                        max_files
                    )));
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                files.push(UploadFile::new(filename, content.to_vec()));
            }
            _ => {
                tracing::debug!("ignoring unknown field: {}", field_name);
            }
        }
    }

    let email = email.ok_or_else(|| UploadError::InvalidRequest("email is required".into()))?;
    let identity = Identity::parse(&email)?;
    let folder = RelativePath::parse(&folder)?;

    tracing::info!(
        identity = %identity,
        folder = %folder,
        count = files.len(),
        "uploading files"
    );

    let stored = state
        .tree()
        .store(&identity, &folder, files, max_files)
        .await?;

    Ok((
        http::StatusCode::OK,
        axum::Json(UploadResponse {
            folder: folder.to_string(),
            files: stored,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("multipart error: {0}")]
    Multipart(String),
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::InvalidRequest(_) | UploadError::Multipart(_) => ErrorKind::Validation,
            UploadError::Namespace(e) => e.kind(),
            UploadError::Storage(e) => e.kind(),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        error_response(self.kind(), &self)
    }
}
