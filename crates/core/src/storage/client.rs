//! Backend client contracts.
//!
//! Adapters never talk HTTP themselves. They drive one of these traits,
//! which the `filestore-azure` crate implements over the Azure Storage REST
//! API and tests implement with mocks.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;

use super::chunk::UploadRange;
use super::error::ServiceError;
use super::path::RemotePath;

/// One entry returned by a backend listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Entry name as returned by the backend.
    pub name: String,
    /// Whether the entry is a directory (or a virtual blob directory).
    pub is_directory: bool,
}

impl RemoteEntry {
    /// Create a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }

    /// Create a directory entry.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }
}

/// Properties returned by an existence probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteProperties {
    /// Size in bytes.
    pub content_length: u64,
    /// Stored content type, if any.
    pub content_type: Option<String>,
}

/// Client for a hierarchical file share.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShareClient: Send + Sync {
    /// Create one directory. The parent must exist.
    async fn create_directory(&self, share: &str, path: &str) -> Result<(), ServiceError>;

    /// Delete an empty directory.
    async fn delete_directory(&self, share: &str, path: &str) -> Result<(), ServiceError>;

    /// Create an empty file with its final size.
    async fn create_file(
        &self,
        share: &str,
        file: &RemotePath,
        size: u64,
        content_type: Option<String>,
    ) -> Result<(), ServiceError>;

    /// Write `data` into `range` of an existing file.
    async fn put_range(
        &self,
        share: &str,
        file: &RemotePath,
        range: UploadRange,
        data: Bytes,
    ) -> Result<(), ServiceError>;

    /// Delete a file.
    async fn delete_file(&self, share: &str, file: &RemotePath) -> Result<(), ServiceError>;

    /// List the files and directories directly inside `path`.
    ///
    /// Names are relative to `path`.
    async fn list_directory(&self, share: &str, path: &str)
    -> Result<Vec<RemoteEntry>, ServiceError>;

    /// Fetch file properties; fails when the file does not exist.
    async fn get_file_properties(
        &self,
        share: &str,
        file: &RemotePath,
    ) -> Result<RemoteProperties, ServiceError>;

    /// URL of a file, without any access signature.
    fn file_url(&self, share: &str, file: &RemotePath) -> String;
}

/// Client for a flat object store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobClient: Send + Sync {
    /// Create a container.
    async fn create_container(&self, container: &str) -> Result<(), ServiceError>;

    /// Delete a container and everything in it.
    async fn delete_container(&self, container: &str) -> Result<(), ServiceError>;

    /// Upload a whole blob from an open local file.
    async fn put_blob(
        &self,
        container: &str,
        blob: &str,
        body: File,
        content_length: u64,
        content_type: Option<String>,
    ) -> Result<(), ServiceError>;

    /// Delete a blob.
    async fn delete_blob(&self, container: &str, blob: &str) -> Result<(), ServiceError>;

    /// List blobs and virtual directories directly under `prefix`.
    ///
    /// Names are full blob names; virtual directories end with `/`.
    async fn list_blobs(
        &self,
        container: &str,
        prefix: &str,
    ) -> Result<Vec<RemoteEntry>, ServiceError>;

    /// Fetch blob properties; fails when the blob does not exist.
    async fn get_blob_properties(
        &self,
        container: &str,
        blob: &str,
    ) -> Result<RemoteProperties, ServiceError>;

    /// URL of a blob, without any access signature.
    fn blob_url(&self, container: &str, blob: &str) -> String;
}
