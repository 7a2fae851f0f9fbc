mod entry;
mod locks;
mod tree;

pub use entry::{Download, EntryKind, StorageEntry, UploadFile};
pub use tree::{StorageTree, MAX_UPLOAD_FILES};

use crate::error::ErrorKind;
use crate::namespace::NamespaceError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("failed to generate upload name: {0}")]
    Entropy(#[from] getrandom::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::Namespace(e) => e.kind(),
            StorageError::NotFound(_) => ErrorKind::NotFound,
            StorageError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            StorageError::Invalid(_) => ErrorKind::Validation,
            StorageError::Entropy(_) | StorageError::Io(_) => ErrorKind::Internal,
        }
    }
}
