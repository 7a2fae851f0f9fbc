use std::fs::Metadata;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::namespace::RelativePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// A file or folder as seen by `list` and `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub path: RelativePath,
    pub kind: EntryKind,
    pub is_folder: bool,
    /// Bytes for files, always 0 for folders
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl StorageEntry {
    pub(crate) fn from_metadata(name: String, path: RelativePath, metadata: &Metadata) -> Self {
        let is_folder = metadata.is_dir();
        Self {
            name,
            path,
            kind: if is_folder {
                EntryKind::Folder
            } else {
                EntryKind::File
            },
            is_folder,
            size: if is_folder { 0 } else { metadata.len() },
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// One file of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Client-supplied name, sanitized before use
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// An open file ready to be streamed to a client.
#[derive(Debug)]
pub struct Download {
    pub file: tokio::fs::File,
    pub filename: String,
    pub size: u64,
    pub mime: String,
}
