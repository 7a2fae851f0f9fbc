//! Shared setup for namespace, storage and share integration tests
#![allow(dead_code)]

use std::sync::Arc;

use common::prelude::*;
use tempfile::TempDir;

pub struct TestEnv {
    pub tree: StorageTree,
    pub registry: Arc<ShareRegistry>,
    pub gate: AccessGate,
    pub temp: TempDir,
}

impl TestEnv {
    pub fn namespace(&self) -> &Namespace {
        self.tree.namespace()
    }
}

/// A storage root and share registry inside a fresh temp dir
pub async fn setup_test_env() -> TestEnv {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let namespace = Namespace::new(temp.path().join("uploads"));
    let registry = Arc::new(
        ShareRegistry::open(temp.path().join("shares.json"))
            .await
            .unwrap(),
    );

    TestEnv {
        tree: StorageTree::new(namespace.clone()),
        gate: AccessGate::new(registry.clone(), namespace),
        registry,
        temp,
    }
}

/// Route `tracing` output through the test harness; `RUST_LOG=debug` shows it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn id(raw: &str) -> Identity {
    Identity::parse(raw).unwrap()
}

pub fn rel(raw: &str) -> RelativePath {
    RelativePath::parse(raw).unwrap()
}
