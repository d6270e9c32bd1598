//! Integration tests for the file storage facade.
//!
//! Drives `FileStorageService` over a `LocalAdapter` rooted in a temporary
//! directory, covering the full directory and file lifecycle.

use std::path::PathBuf;

use filestore_core::storage::{ErrorKind, FileStorageService, LocalAdapter, StorageError};
use tempfile::TempDir;

/// Helper holding the temporary tree alive for the duration of a test.
struct TestStore {
    temp: TempDir,
    service: FileStorageService,
}

impl TestStore {
    fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let adapter = LocalAdapter::new(
            temp.path().join("www/public/storage"),
            "https://cdn.example.com",
        )
        .expect("adapter");

        Self {
            temp,
            service: FileStorageService::new(adapter),
        }
    }

    fn local_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, contents).expect("write local file");
        path
    }

    fn stored(&self, path: &str) -> PathBuf {
        self.temp.path().join("www/public/storage").join(path)
    }
}

#[tokio::test]
async fn test_created_directory_is_listed_in_parent() {
    let store = TestStore::new();

    store
        .service
        .create_directory("/projects")
        .await
        .expect("create parent");
    store
        .service
        .create_directory("projects/alpha")
        .await
        .expect("create child");

    let entries = store
        .service
        .list_files_in_directory("projects", true)
        .await
        .expect("list");
    assert_eq!(entries, vec!["alpha"]);

    let files = store
        .service
        .list_files_in_directory("projects", false)
        .await
        .expect("list");
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_file_lifecycle() {
    let store = TestStore::new();
    let source = store.local_file("contract.pdf", b"%PDF-1.7 contract");

    store
        .service
        .create_directory("contracts")
        .await
        .expect("create");
    store
        .service
        .upload_file("/contracts/", &source)
        .await
        .expect("upload");

    assert_eq!(
        std::fs::read(store.stored("contracts/contract.pdf")).expect("read stored"),
        b"%PDF-1.7 contract"
    );
    assert_eq!(
        store
            .service
            .list_files_in_directory("contracts", false)
            .await
            .expect("list"),
        vec!["contract.pdf"]
    );
    assert_eq!(
        store
            .service
            .get_public_file_url("contracts/contract.pdf")
            .await
            .expect("url"),
        "https://cdn.example.com/storage/contracts/contract.pdf"
    );

    // A non-empty directory cannot be removed.
    let err = store
        .service
        .delete_directory("contracts")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEmpty);

    store
        .service
        .delete_file("/contracts/contract.pdf")
        .await
        .expect("delete file");
    store
        .service
        .delete_directory("contracts")
        .await
        .expect("delete directory");

    let err = store
        .service
        .list_files_in_directory("contracts", true)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn test_upload_of_empty_file() {
    let store = TestStore::new();
    let source = store.local_file("empty.txt", b"");

    store.service.create_directory("inbox").await.expect("create");
    store
        .service
        .upload_file("inbox", &source)
        .await
        .expect("upload");

    let metadata = std::fs::metadata(store.stored("inbox/empty.txt")).expect("metadata");
    assert_eq!(metadata.len(), 0);
}

#[tokio::test]
async fn test_errors_surface_with_stable_codes() {
    let store = TestStore::new();

    store.service.create_directory("a").await.expect("create");
    let cases = [
        (
            store.service.create_directory("a").await.unwrap_err(),
            "ALREADY_EXISTS",
        ),
        (
            store.service.create_directory("x/y").await.unwrap_err(),
            "PARENT_NOT_FOUND",
        ),
        (
            store.service.delete_directory("missing").await.unwrap_err(),
            "NOT_FOUND",
        ),
        (
            store.service.delete_file("a/none.txt").await.unwrap_err(),
            "REMOTE_FILE_NOT_FOUND",
        ),
        (
            store.service.delete_file("ghost/none.txt").await.unwrap_err(),
            "REMOTE_FILE_NOT_FOUND",
        ),
        (
            store.service.list_files_in_directory("a/..", true).await.unwrap_err(),
            "NOT_FOUND",
        ),
        (
            store
                .service
                .upload_file("a", &store.temp.path().join("none.txt"))
                .await
                .unwrap_err(),
            "LOCAL_FILE_NOT_FOUND",
        ),
        (
            store
                .service
                .get_public_file_url("a/none.txt")
                .await
                .unwrap_err(),
            "REMOTE_FILE_NOT_FOUND",
        ),
    ];

    for (err, code) in cases {
        assert_eq!(err.kind().code(), code, "unexpected error: {err}");
    }
}

#[tokio::test]
async fn test_failed_delete_has_no_side_effect() {
    let store = TestStore::new();
    store.service.create_directory("keep").await.expect("create");

    let err = store
        .service
        .delete_directory("keep/missing")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    assert!(store.stored("keep").is_dir());
}
