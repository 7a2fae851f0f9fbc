//! Containment properties of identity and path resolution

mod helpers;

use common::prelude::*;
use helpers::{id, rel};

const HOSTILE: &[&str] = &[
    "../",
    "../../etc/passwd",
    "/etc/passwd",
    "....//....//",
    "....//....//etc/shadow",
    "..\\..\\windows",
    ".../...//",
    "a@b.com/../../c@d.com",
    "%2e%2e/%2e%2e",
    "./././",
    "..;/..;/",
    "\u{0}../x",
];

#[tokio::test]
async fn test_hostile_identities_stay_under_their_root() {
    let env = helpers::setup_test_env().await;
    let ns = env.namespace();

    for raw in HOSTILE {
        let Ok(identity) = Identity::parse(raw) else {
            // rejected outright is fine too
            continue;
        };
        let identity_root = ns.identity_root(&identity);
        assert!(identity_root.starts_with(ns.root()), "{raw:?}");
        assert_eq!(identity_root.parent(), Some(ns.root()), "{raw:?}");

        let resolved = ns.resolve(&identity, &rel("notes.txt")).await.unwrap();
        assert!(resolved.starts_with(&identity_root), "{raw:?}");
    }
}

#[tokio::test]
async fn test_hostile_paths_never_resolve_outside_namespace() {
    let env = helpers::setup_test_env().await;
    let ns = env.namespace();
    let identity = id("a@b.com");
    let identity_root = ns.identity_root(&identity);

    for raw in HOSTILE {
        match RelativePath::parse(raw) {
            Ok(path) => {
                let resolved = ns.resolve(&identity, &path).await.unwrap();
                assert!(resolved.starts_with(&identity_root), "{raw:?} -> {resolved:?}");
            }
            Err(err) => assert_eq!(err.kind(), ErrorKind::PathEscape, "{raw:?}"),
        }
    }
}

#[test]
fn test_explicit_parent_segments_fail_hard() {
    for raw in ["../c@d.com/notes.txt", "docs/../../x", ".."] {
        let err = RelativePath::parse(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathEscape, "{raw:?}");
    }

    // and through the storage layer the kind is preserved
    let err = RelativePath::parse("../c@d.com")
        .map_err(StorageError::from)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathEscape);
}

#[tokio::test]
async fn test_identities_are_isolated() {
    let env = helpers::setup_test_env().await;
    let alice = id("alice@example.com");
    let bob = id("bob@example.com");

    env.tree
        .write_content(&alice, &rel("secret.txt"), "alice only")
        .await
        .unwrap();

    let err = env
        .tree
        .read_content(&bob, &rel("secret.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(env.tree.list(&bob, &RelativePath::root()).await.unwrap().is_empty());
}
