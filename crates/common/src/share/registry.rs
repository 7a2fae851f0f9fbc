use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::{Permission, ShareError, ShareRecord};
use crate::namespace::{Identity, RelativePath};
use crate::token::{self, SHARE_TOKEN_BYTES};

/// Lifetime of every share, counted from creation.
pub const SHARE_TTL_HOURS: i64 = 24;

/// Durable token -> [`ShareRecord`] map.
///
/// The full map is kept in memory and rewritten to disk on every mutation.
/// All mutations go through one mutex, so concurrent creates never lose
/// each other's records.
#[derive(Debug)]
pub struct ShareRegistry {
    path: PathBuf,
    records: Mutex<HashMap<String, ShareRecord>>,
}

impl ShareRegistry {
    /// Load the registry at `path`, starting empty if the file is absent.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ShareError> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), shares = records.len(), "opened share registry");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn create(
        &self,
        owner: &Identity,
        files: impl IntoIterator<Item = RelativePath>,
        folders: impl IntoIterator<Item = RelativePath>,
        permission: Permission,
    ) -> Result<ShareRecord, ShareError> {
        let files: BTreeSet<RelativePath> = files.into_iter().collect();
        let folders: BTreeSet<RelativePath> = folders.into_iter().collect();
        if files.is_empty() && folders.is_empty() {
            return Err(ShareError::Empty);
        }
        if files.iter().any(RelativePath::is_root) {
            return Err(ShareError::InvalidPath(
                "the namespace root is not a file".to_string(),
            ));
        }

        let mut records = self.records.lock().await;

        let mut token = token::generate(SHARE_TOKEN_BYTES)?;
        while records.contains_key(&token) {
            token = token::generate(SHARE_TOKEN_BYTES)?;
        }

        let created_at = Utc::now();
        let record = ShareRecord {
            token: token.clone(),
            owner: owner.clone(),
            files,
            folders,
            permission,
            created_at,
            expires_at: created_at + Duration::hours(SHARE_TTL_HOURS),
        };

        records.insert(token.clone(), record.clone());
        if let Err(e) = self.persist(&records).await {
            records.remove(&token);
            return Err(e);
        }

        tracing::info!(
            owner = %owner,
            files = record.files.len(),
            folders = record.folders.len(),
            permission = %permission,
            expires_at = %record.expires_at,
            "created share"
        );
        Ok(record)
    }

    pub async fn lookup(&self, token: &str) -> Option<ShareRecord> {
        self.records.lock().await.get(token).cloned()
    }

    /// All shares owned by `owner`, newest first.
    pub async fn list_for(&self, owner: &Identity) -> Vec<ShareRecord> {
        let records = self.records.lock().await;
        let mut owned: Vec<ShareRecord> = records
            .values()
            .filter(|record| record.owner == *owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned
    }

    /// Delete a share. Only its owner may do so.
    pub async fn revoke(&self, owner: &Identity, token: &str) -> Result<ShareRecord, ShareError> {
        let mut records = self.records.lock().await;
        match records.get(token) {
            None => return Err(ShareError::NotFound),
            Some(record) if record.owner != *owner => return Err(ShareError::NotOwner),
            Some(_) => {}
        }

        let Some(removed) = records.remove(token) else {
            return Err(ShareError::NotFound);
        };
        if let Err(e) = self.persist(&records).await {
            records.insert(token.to_string(), removed);
            return Err(e);
        }

        tracing::info!(owner = %owner, "revoked share");
        Ok(removed)
    }

    /// Drop every record that is no longer live at `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, ShareError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.is_live_at(now));
        let purged = before - records.len();

        if purged > 0 {
            self.persist(&records).await?;
            tracing::info!(purged, "purged expired shares");
        }
        Ok(purged)
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Write the whole map to a sibling temp file, then rename it into place.
    async fn persist(&self, records: &HashMap<String, ShareRecord>) -> Result<(), ShareError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
