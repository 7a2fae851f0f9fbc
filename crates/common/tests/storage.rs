//! Integration tests for storage tree operations

mod helpers;

use common::prelude::*;
use helpers::{id, rel};
use tokio::io::AsyncReadExt;

#[tokio::test]
async fn test_write_then_read_round_trip() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    let cases: &[(&str, &[u8])] = &[
        ("notes.txt", b"hello"),
        ("deep/nested/dir/file.md", b"# title\n"),
        ("empty.txt", b""),
        ("binary.bin", &[0, 159, 146, 150, 255]),
    ];

    for (path, content) in cases {
        let path = rel(path);
        let written = env.tree.write_content(&owner, &path, content).await.unwrap();
        assert_eq!(written, content.len() as u64);
        assert_eq!(env.tree.read_content(&owner, &path).await.unwrap(), *content);
    }
}

#[tokio::test]
async fn test_write_overwrites() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    let path = rel("notes.txt");

    env.tree.write_content(&owner, &path, "first").await.unwrap();
    env.tree.write_content(&owner, &path, "second").await.unwrap();
    assert_eq!(env.tree.read_text(&owner, &path).await.unwrap(), "second");
}

#[tokio::test]
async fn test_list_missing_folder_is_empty() {
    let env = helpers::setup_test_env().await;
    let owner = id("nobody@example.com");

    assert!(env.tree.list(&owner, &RelativePath::root()).await.unwrap().is_empty());
    assert!(env.tree.list(&owner, &rel("no/such/folder")).await.unwrap().is_empty());
    // listing must not create the namespace
    assert!(!env.namespace().identity_root(&owner).exists());
}

#[tokio::test]
async fn test_list_sorts_folders_first() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    env.tree.write_content(&owner, &rel("b.txt"), "bb").await.unwrap();
    env.tree.write_content(&owner, &rel("a.txt"), "a").await.unwrap();
    env.tree
        .create_folder(&owner, &RelativePath::root(), "zeta")
        .await
        .unwrap();

    let entries = env.tree.list(&owner, &RelativePath::root()).await.unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["zeta", "a.txt", "b.txt"]);
    assert!(entries[0].is_folder);
    assert_eq!(entries[0].kind, EntryKind::Folder);
    assert_eq!(entries[0].size, 0);
    assert_eq!(entries[2].size, 2);
    assert_eq!(entries[2].path, rel("b.txt"));
    assert!(entries[2].modified.is_some());
}

#[tokio::test]
async fn test_list_a_file_is_invalid() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree.write_content(&owner, &rel("a.txt"), "a").await.unwrap();

    let err = env.tree.list(&owner, &rel("a.txt")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_folder_is_idempotent() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    let first = env
        .tree
        .create_folder(&owner, &rel("projects"), "2024")
        .await
        .unwrap();
    let second = env
        .tree
        .create_folder(&owner, &rel("projects"), "2024")
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first, rel("projects/2024"));

    let err = env
        .tree
        .create_folder(&owner, &RelativePath::root(), "../..")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_file_collision() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    let path = env
        .tree
        .create_file(&owner, &rel("drafts"), "todo", ".md")
        .await
        .unwrap();
    assert_eq!(path, rel("drafts/todo.md"));
    assert_eq!(env.tree.read_content(&owner, &path).await.unwrap(), b"");

    let err = env
        .tree
        .create_file(&owner, &rel("drafts"), "todo", "md")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let plain = env
        .tree
        .create_file(&owner, &rel("drafts"), "README", "")
        .await
        .unwrap();
    assert_eq!(plain, rel("drafts/README"));

    let err = env
        .tree
        .create_file(&owner, &rel("drafts"), "", "txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_read_missing_and_folder_is_not_found() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree
        .create_folder(&owner, &RelativePath::root(), "docs")
        .await
        .unwrap();

    for path in ["missing.txt", "docs"] {
        let err = env.tree.read_content(&owner, &rel(path)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{path}");
    }
}

#[tokio::test]
async fn test_read_text_rejects_binary() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree
        .write_content(&owner, &rel("blob.bin"), [0xff, 0xfe, 0x00])
        .await
        .unwrap();

    let err = env.tree.read_text(&owner, &rel("blob.bin")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_paths_through_a_file_are_invalid() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree.write_content(&owner, &rel("a.txt"), "a").await.unwrap();

    let err = env
        .tree
        .write_content(&owner, &rel("a.txt/b.txt"), "b")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)), "{err:?}");

    let err = env
        .tree
        .write_content(&owner, &rel("a.txt/deeper/b.txt"), "b")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)), "{err:?}");

    let err = env
        .tree
        .create_folder(&owner, &rel("a.txt"), "sub")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)), "{err:?}");

    let err = env
        .tree
        .create_file(&owner, &rel("a.txt"), "todo", "md")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)), "{err:?}");

    let err = env
        .tree
        .store(&owner, &rel("a.txt"), vec![UploadFile::new("x.txt", "x")], 1)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)), "{err:?}");

    // the existing file itself is still a name clash
    let err = env
        .tree
        .create_folder(&owner, &RelativePath::root(), "a.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let err = env.tree.read_content(&owner, &rel("a.txt/b.txt")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(env.tree.read_text(&owner, &rel("a.txt")).await.unwrap(), "a");
}

#[tokio::test]
async fn test_store_batch() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    let stored = env
        .tree
        .store(
            &owner,
            &rel("inbox"),
            vec![
                UploadFile::new("same.txt", "one"),
                UploadFile::new("same.txt", "two"),
                UploadFile::new("../../evil.sh", "three"),
            ],
            MAX_UPLOAD_FILES,
        )
        .await
        .unwrap();

    assert_eq!(stored.len(), 3);
    assert_ne!(stored[0], stored[1]);
    assert!(stored[0].ends_with("-same.txt"));
    assert!(stored[2].ends_with("-evil.sh"));

    let listed = env.tree.list(&owner, &rel("inbox")).await.unwrap();
    assert_eq!(listed.len(), 3);

    let second = rel("inbox").join(&stored[1]).unwrap();
    assert_eq!(env.tree.read_text(&owner, &second).await.unwrap(), "two");
}

#[tokio::test]
async fn test_store_rejects_empty_and_oversized_batches() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");

    let err = env
        .tree
        .store(&owner, &RelativePath::root(), vec![], MAX_UPLOAD_FILES)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let too_many = (0..=MAX_UPLOAD_FILES)
        .map(|i| UploadFile::new(format!("{i}.txt"), "x"))
        .collect();
    let err = env
        .tree
        .store(&owner, &RelativePath::root(), too_many, MAX_UPLOAD_FILES)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    // a lower configured cap is honored
    let three = (0..3).map(|i| UploadFile::new(format!("{i}.txt"), "x")).collect();
    let err = env
        .tree
        .store(&owner, &RelativePath::root(), three, 2)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(env.tree.list(&owner, &RelativePath::root()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rename() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree.write_content(&owner, &rel("docs/a.txt"), "a").await.unwrap();
    env.tree.write_content(&owner, &rel("docs/b.txt"), "b").await.unwrap();

    let renamed = env
        .tree
        .rename(&owner, &rel("docs/a.txt"), "c.txt")
        .await
        .unwrap();
    assert_eq!(renamed, rel("docs/c.txt"));
    assert!(!env.tree.exists(&owner, &rel("docs/a.txt")).await.unwrap());
    assert_eq!(env.tree.read_text(&owner, &renamed).await.unwrap(), "a");

    let err = env
        .tree
        .rename(&owner, &rel("docs/c.txt"), "b.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(env.tree.read_text(&owner, &rel("docs/b.txt")).await.unwrap(), "b");

    let err = env
        .tree
        .rename(&owner, &rel("docs/missing.txt"), "x.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // same name is a no-op
    let same = env
        .tree
        .rename(&owner, &rel("docs/b.txt"), "b.txt")
        .await
        .unwrap();
    assert_eq!(same, rel("docs/b.txt"));

    // the new name cannot smuggle in a directory
    let moved = env
        .tree
        .rename(&owner, &rel("docs/b.txt"), "../b2.txt")
        .await
        .unwrap();
    assert_eq!(moved, rel("docs/b2.txt"));
}

#[tokio::test]
async fn test_remove_file_and_folder() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree.write_content(&owner, &rel("a.txt"), "a").await.unwrap();
    env.tree
        .write_content(&owner, &rel("tree/x/y/z.txt"), "z")
        .await
        .unwrap();

    env.tree.remove(&owner, &rel("a.txt")).await.unwrap();
    env.tree.remove(&owner, &rel("tree")).await.unwrap();
    assert!(env.tree.list(&owner, &RelativePath::root()).await.unwrap().is_empty());

    let err = env.tree.remove(&owner, &rel("a.txt")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = env
        .tree
        .remove(&owner, &RelativePath::root())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_download_metadata() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    env.tree
        .write_content(&owner, &rel("site/index.html"), "<p>hi</p>")
        .await
        .unwrap();

    let mut download = env
        .tree
        .download(&owner, &rel("site/index.html"))
        .await
        .unwrap();
    assert_eq!(download.filename, "index.html");
    assert_eq!(download.size, 9);
    assert_eq!(download.mime, "text/html");

    let mut body = String::new();
    download.file.read_to_string(&mut body).await.unwrap();
    assert_eq!(body, "<p>hi</p>");

    let err = env.tree.download(&owner, &rel("site")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_concurrent_writes_to_one_path_leave_one_whole_value() {
    let env = helpers::setup_test_env().await;
    let owner = id("a@b.com");
    let path = rel("contended.txt");

    let writes = (0..16).map(|i| {
        let tree = env.tree.clone();
        let owner = owner.clone();
        let path = path.clone();
        tokio::spawn(async move {
            let content = format!("{i}").repeat(4096);
            tree.write_content(&owner, &path, content).await.unwrap();
        })
    });
    for task in futures::future::join_all(writes).await {
        task.unwrap();
    }

    let content = env.tree.read_text(&owner, &path).await.unwrap();
    assert!((0..16).any(|i| content == format!("{i}").repeat(4096)));
}
