use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable classification of every failure the core can report.
///
/// Callers (the HTTP layer, the CLI) branch on the kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    NotFound,
    AlreadyExists,
    PathEscape,
    Deny,
    Expired,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::PathEscape => "PATH_ESCAPE",
            ErrorKind::Deny => "DENY",
            ErrorKind::Expired => "EXPIRED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_to_stable_names() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::Validation).unwrap(),
            "\"VALIDATION_ERROR\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::PathEscape).unwrap(),
            "\"PATH_ESCAPE\""
        );
        assert_eq!(ErrorKind::AlreadyExists.to_string(), "ALREADY_EXISTS");
    }
}
