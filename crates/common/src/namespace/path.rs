use std::fmt;

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize_segment;
use super::NamespaceError;

/// The owner of a storage namespace, e.g. an email address.
///
/// Unauthenticated and never validated as an email; only sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Result<Self, NamespaceError> {
        let sanitized = sanitize_segment(raw);
        if sanitized.is_empty() || sanitized == "." {
            return Err(NamespaceError::InvalidIdentity(raw.to_string()));
        }
        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

/// A normalized path inside one identity's namespace.
///
/// Every segment is non-empty, free of separators and never `.` or `..`.
/// The empty path is the namespace root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(Vec<String>);

impl RelativePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Split on `/` and `\`, reject raw `..` segments, sanitize the rest.
    pub fn parse(raw: &str) -> Result<Self, NamespaceError> {
        let mut segments = Vec::new();
        for raw_segment in raw.split(|c| c == '/' || c == '\\') {
            if raw_segment.trim() == ".." {
                tracing::warn!(path = %raw, "rejected parent directory segment");
                return Err(NamespaceError::PathEscape(raw.to_string()));
            }
            let segment = sanitize_segment(raw_segment);
            if segment.is_empty() || segment == "." {
                continue;
            }
            segments.push(segment);
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a single sanitized name. Empty names are rejected.
    pub fn join(&self, name: &str) -> Result<Self, NamespaceError> {
        let segment = sanitize_segment(name);
        if segment.is_empty() || segment == "." {
            return Err(NamespaceError::InvalidName(name.to_string()));
        }
        let mut segments = self.0.clone();
        segments.push(segment);
        Ok(Self(segments))
    }

    pub fn parent(&self) -> Option<Self> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Segment-wise prefix test; `docs` covers `docs/a.txt` but not `docsx`.
    pub fn starts_with(&self, prefix: &RelativePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl TryFrom<String> for RelativePath {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RelativePath> for String {
    fn from(value: RelativePath) -> Self {
        value.to_string()
    }
}
