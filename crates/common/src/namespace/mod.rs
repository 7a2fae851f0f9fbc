mod path;
mod resolver;
pub mod sanitize;

pub use path::{Identity, RelativePath};
pub use resolver::Namespace;

use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("identity is empty after sanitization: {0:?}")]
    InvalidIdentity(String),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("path escapes its namespace: {0}")]
    PathEscape(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl NamespaceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NamespaceError::InvalidIdentity(_) | NamespaceError::InvalidName(_) => {
                ErrorKind::Validation
            }
            NamespaceError::PathEscape(_) => ErrorKind::PathEscape,
            NamespaceError::Io(_) => ErrorKind::Internal,
        }
    }
}
