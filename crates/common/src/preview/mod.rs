mod store;

pub use store::{PreviewRecord, PreviewStore, PREVIEW_TTL};

use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("preview content is empty")]
    EmptyContent,
    #[error("invalid base url {0:?}: {1}")]
    InvalidBaseUrl(String, String),
    #[error("failed to generate token: {0}")]
    Entropy(#[from] getrandom::Error),
}

impl PreviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreviewError::EmptyContent | PreviewError::InvalidBaseUrl(..) => ErrorKind::Validation,
            PreviewError::Entropy(_) => ErrorKind::Internal,
        }
    }
}
