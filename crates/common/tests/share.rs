//! Share registry and access gate integration tests

mod helpers;

use std::collections::HashSet;

use chrono::{Duration, Utc};
use common::prelude::*;
use helpers::{id, rel};

#[tokio::test]
async fn test_share_lifecycle() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree.write_content(&owner, &rel("a.txt"), "a").await.unwrap();

    let record = env
        .registry
        .create(&owner, vec![rel("a.txt")], vec![], Permission::Read)
        .await
        .unwrap();

    let looked_up = env.registry.lookup(&record.token).await.unwrap();
    assert!(looked_up.is_live());
    assert_eq!(looked_up, record);

    let decision = env.gate.authorize(&record.token, "a.txt").await.unwrap();
    assert!(matches!(decision, AccessDecision::Allow(_)));

    let after = record.expires_at + Duration::milliseconds(1);
    for path in ["a.txt", "b.txt", "nested/c.txt"] {
        let decision = env
            .gate
            .authorize_at(&record.token, path, after)
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::Expired, "{path}");
    }
}

#[tokio::test]
async fn test_uncovered_readable_file_is_denied() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree.write_content(&owner, &rel("shared.txt"), "s").await.unwrap();
    env.tree.write_content(&owner, &rel("other.txt"), "o").await.unwrap();

    let token = env
        .registry
        .create(&owner, vec![rel("shared.txt")], vec![], Permission::Download)
        .await
        .unwrap()
        .token;

    assert!(env.tree.read_content(&owner, &rel("other.txt")).await.is_ok());
    let decision = env.gate.authorize(&token, "other.txt").await.unwrap();
    assert_eq!(decision, AccessDecision::Deny);
    assert_eq!(decision.kind(), Some(ErrorKind::Deny));
}

#[tokio::test]
async fn test_folder_share_covers_subtree_only() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree
        .write_content(&owner, &rel("album/2024/a.jpg"), "jpg")
        .await
        .unwrap();
    env.tree.write_content(&owner, &rel("private.txt"), "p").await.unwrap();

    let token = env
        .registry
        .create(&owner, vec![], vec![rel("album")], Permission::Read)
        .await
        .unwrap()
        .token;

    match env.gate.authorize(&token, "album/2024/a.jpg").await.unwrap() {
        AccessDecision::Allow(grant) => assert_eq!(grant.path, rel("album/2024/a.jpg")),
        other => panic!("expected allow, got {other:?}"),
    }
    assert_eq!(
        env.gate.authorize(&token, "private.txt").await.unwrap(),
        AccessDecision::Deny
    );
}

#[tokio::test]
async fn test_share_cannot_reach_other_namespace() {
    let env = helpers::setup_test_env().await;
    let alice = id("alice@example.com");
    let bob = id("bob@example.com");
    env.tree.write_content(&alice, &rel("a.txt"), "a").await.unwrap();
    env.tree.write_content(&bob, &rel("a.txt"), "bob").await.unwrap();

    let token = env
        .registry
        .create(&alice, vec![rel("a.txt")], vec![], Permission::Read)
        .await
        .unwrap()
        .token;

    let err = env
        .gate
        .authorize(&token, "../bob@example.com/a.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathEscape);

    match env.gate.authorize(&token, "a.txt").await.unwrap() {
        AccessDecision::Allow(grant) => {
            assert_eq!(std::fs::read_to_string(grant.absolute).unwrap(), "a")
        }
        other => panic!("expected allow, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_creates_are_all_retrievable() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    const N: usize = 32;

    let creates = (0..N).map(|i| {
        let registry = env.registry.clone();
        let owner = owner.clone();
        tokio::spawn(async move {
            registry
                .create(
                    &owner,
                    vec![rel(&format!("file-{i}.txt"))],
                    vec![],
                    Permission::Read,
                )
                .await
                .unwrap()
                .token
        })
    });

    let tokens: Vec<String> = futures::future::join_all(creates)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(tokens.iter().collect::<HashSet<_>>().len(), N);

    for token in &tokens {
        assert!(env.registry.lookup(token).await.is_some());
    }

    // and every one of them made it to disk
    let reopened = ShareRegistry::open(env.registry.path()).await.unwrap();
    for token in &tokens {
        assert!(reopened.lookup(token).await.is_some(), "{token} lost on disk");
    }
    assert_eq!(reopened.len().await, N);
}

#[tokio::test]
async fn test_expired_records_are_purged_but_live_ones_kept() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    let record = env
        .registry
        .create(&owner, vec![rel("a.txt")], vec![], Permission::Read)
        .await
        .unwrap();

    assert_eq!(env.registry.purge_expired(Utc::now()).await.unwrap(), 0);
    assert_eq!(
        env.registry
            .purge_expired(record.expires_at)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        env.gate.authorize(&record.token, "a.txt").await.unwrap(),
        AccessDecision::NotFound
    );
}
