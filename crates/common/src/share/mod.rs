mod record;
mod registry;

pub use record::{Permission, ShareRecord};
pub use registry::{ShareRegistry, SHARE_TTL_HOURS};

use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("a share must name at least one file or folder")]
    Empty,
    #[error("invalid share path: {0}")]
    InvalidPath(String),
    #[error("invalid permission: {0:?} (expected read or download)")]
    InvalidPermission(String),
    #[error("share not found")]
    NotFound,
    #[error("share belongs to another identity")]
    NotOwner,
    #[error("failed to generate token: {0}")]
    Entropy(#[from] getrandom::Error),
    #[error("share registry io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("share registry is unreadable: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ShareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShareError::Empty | ShareError::InvalidPath(_) | ShareError::InvalidPermission(_) => {
                ErrorKind::Validation
            }
            ShareError::NotFound => ErrorKind::NotFound,
            ShareError::NotOwner => ErrorKind::Deny,
            ShareError::Entropy(_) | ShareError::Io(_) | ShareError::Serde(_) => {
                ErrorKind::Internal
            }
        }
    }
}
