use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ErrorKind;
use crate::namespace::{Identity, Namespace, NamespaceError, RelativePath};
use crate::share::{Permission, ShareRegistry};

/// Everything needed to serve a file through a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub owner: Identity,
    pub path: RelativePath,
    pub absolute: PathBuf,
    pub permission: Permission,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(Grant),
    Deny,
    NotFound,
    Expired,
}

impl AccessDecision {
    /// The failure kind for a refusal, `None` for [`AccessDecision::Allow`].
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AccessDecision::Allow(_) => None,
            AccessDecision::Deny => Some(ErrorKind::Deny),
            AccessDecision::NotFound => Some(ErrorKind::NotFound),
            AccessDecision::Expired => Some(ErrorKind::Expired),
        }
    }
}

/// Decides whether a bearer token may read a path in its owner's namespace.
#[derive(Debug, Clone)]
pub struct AccessGate {
    registry: Arc<ShareRegistry>,
    namespace: Namespace,
}

impl AccessGate {
    pub fn new(registry: Arc<ShareRegistry>, namespace: Namespace) -> Self {
        Self {
            registry,
            namespace,
        }
    }

    pub async fn authorize(
        &self,
        token: &str,
        requested: &str,
    ) -> Result<AccessDecision, NamespaceError> {
        self.authorize_at(token, requested, Utc::now()).await
    }

    /// Like [`AccessGate::authorize`], evaluated at `now`.
    ///
    /// Path escapes are returned as errors, never folded into a decision.
    pub async fn authorize_at(
        &self,
        token: &str,
        requested: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessDecision, NamespaceError> {
        let Some(record) = self.registry.lookup(token).await else {
            return Ok(AccessDecision::NotFound);
        };

        if !record.is_live_at(now) {
            tracing::warn!(owner = %record.owner, expires_at = %record.expires_at, "expired share used");
            return Ok(AccessDecision::Expired);
        }

        let path = RelativePath::parse(requested)?;
        if !record.covers(&path) {
            tracing::warn!(owner = %record.owner, path = %path, "share does not cover path");
            return Ok(AccessDecision::Deny);
        }

        let absolute = self.namespace.resolve(&record.owner, &path).await?;
        match tokio::fs::metadata(&absolute).await {
            Ok(metadata) if metadata.is_file() => Ok(AccessDecision::Allow(Grant {
                owner: record.owner,
                path,
                absolute,
                permission: record.permission,
                expires_at: record.expires_at,
            })),
            Ok(_) => Ok(AccessDecision::NotFound),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(AccessDecision::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
