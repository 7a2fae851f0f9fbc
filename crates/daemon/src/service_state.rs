use std::sync::Arc;

use common::prelude::{
    AccessGate, Namespace, PreviewStore, ShareError, ShareRegistry, StorageTree,
};

use crate::ServiceConfig;

/// Shared handles every request handler works through.
#[derive(Debug, Clone)]
pub struct State {
    tree: StorageTree,
    shares: Arc<ShareRegistry>,
    gate: AccessGate,
    previews: PreviewStore,
    max_upload_files: usize,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        tokio::fs::create_dir_all(&config.storage_root).await?;
        let namespace = Namespace::new(&config.storage_root);

        let shares = Arc::new(ShareRegistry::open(&config.shares_path).await?);
        let share_count = shares.len().await;

        tracing::info!(
            storage_root = %config.storage_root.display(),
            shares = share_count,
            "service state ready"
        );

        Ok(Self {
            tree: StorageTree::new(namespace.clone()),
            gate: AccessGate::new(shares.clone(), namespace),
            shares,
            previews: PreviewStore::new(),
            max_upload_files: config.max_upload_files,
        })
    }

    pub fn tree(&self) -> &StorageTree {
        &self.tree
    }

    pub fn shares(&self) -> &Arc<ShareRegistry> {
        &self.shares
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn max_upload_files(&self) -> usize {
        self.max_upload_files
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to prepare storage root: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to open share registry: {0}")]
    Shares(#[from] ShareError),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn config(dir: &TempDir) -> ServiceConfig {
        ServiceConfig {
            storage_root: dir.path().join("uploads"),
            shares_path: dir.path().join("shares.json"),
            max_upload_files: 20,
            api_port: 5001,
            gateway_port: 9090,
            log_level: tracing::Level::INFO,
            log_dir: None,
            gateway_url: None,
        }
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_from_config_future_is_send() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        // spawned from the async Op::execute of the daemon command
        let setup = State::from_config(&config);
        assert_send(&setup);
    }

    #[tokio::test]
    async fn test_from_config_creates_storage_root() {
        let dir = TempDir::new().unwrap();
        let state = State::from_config(&config(&dir)).await.unwrap();
        assert!(dir.path().join("uploads").is_dir());
        assert!(state.shares().is_empty().await);
        assert_eq!(state.max_upload_files(), 20);
    }
}
