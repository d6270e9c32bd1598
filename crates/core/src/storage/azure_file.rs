//! Azure File Share adapter.
//!
//! Directories are real share directories. Uploads create the remote file at
//! its final size and then write it in contiguous ranges of at most
//! [`MAX_RANGE_SIZE`] bytes.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::adapter::{FileStorageAdapter, map_service_error, with_signature};
use super::chunk::{MAX_RANGE_SIZE, upload_ranges};
use super::client::ShareClient;
use super::error::{ErrorKind, StorageError, StorageResult, markers};
use super::path::{RemotePath, normalize};
use super::source::LocalSource;

const CREATE_DIRECTORY: &[(&str, ErrorKind)] = &[
    (markers::RESOURCE_ALREADY_EXISTS, ErrorKind::AlreadyExists),
    (markers::PARENT_NOT_FOUND, ErrorKind::ParentNotFound),
];

const DELETE_DIRECTORY: &[(&str, ErrorKind)] = &[
    (markers::RESOURCE_NOT_FOUND, ErrorKind::NotFound),
    (markers::PARENT_NOT_FOUND, ErrorKind::NotFound),
    (markers::DIRECTORY_NOT_EMPTY, ErrorKind::NotEmpty),
];

const CREATE_FILE: &[(&str, ErrorKind)] =
    &[(markers::PARENT_NOT_FOUND, ErrorKind::ParentNotFound)];

const FILE_LOOKUP: &[(&str, ErrorKind)] = &[
    (markers::RESOURCE_NOT_FOUND, ErrorKind::RemoteFileNotFound),
    (markers::PARENT_NOT_FOUND, ErrorKind::RemoteFileNotFound),
];

const LIST_DIRECTORY: &[(&str, ErrorKind)] = &[
    (markers::RESOURCE_NOT_FOUND, ErrorKind::NotFound),
    (markers::PARENT_NOT_FOUND, ErrorKind::NotFound),
];

/// Adapter over one Azure file share.
#[derive(Debug)]
pub struct AzureFileAdapter<C> {
    client: C,
    share: String,
    shared_access_signature: String,
    chunk_size: u64,
}

impl<C: ShareClient> AzureFileAdapter<C> {
    /// Create an adapter for `share`.
    ///
    /// `shared_access_signature` is appended to public URLs.
    pub fn new(
        client: C,
        share: impl Into<String>,
        shared_access_signature: impl Into<String>,
    ) -> Self {
        Self {
            client,
            share: share.into(),
            shared_access_signature: shared_access_signature.into(),
            chunk_size: MAX_RANGE_SIZE,
        }
    }

    /// Override the upload range size, capped at [`MAX_RANGE_SIZE`].
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_RANGE_SIZE);
        self
    }

    /// Upload range size in bytes.
    #[must_use]
    pub const fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Share this adapter writes to.
    #[must_use]
    pub fn share(&self) -> &str {
        &self.share
    }
}

#[async_trait]
impl<C: ShareClient> FileStorageAdapter for AzureFileAdapter<C> {
    async fn create_directory(&self, path: &str) -> StorageResult<()> {
        let path = normalize(path);
        debug!(share = %self.share, path, "creating share directory");

        self.client
            .create_directory(&self.share, path)
            .await
            .map_err(|e| map_service_error(&e, "create_directory", path, CREATE_DIRECTORY))
    }

    async fn delete_directory(&self, path: &str) -> StorageResult<()> {
        let path = normalize(path);
        debug!(share = %self.share, path, "deleting share directory");

        self.client
            .delete_directory(&self.share, path)
            .await
            .map_err(|e| map_service_error(&e, "delete_directory", path, DELETE_DIRECTORY))
    }

    async fn upload_file(&self, directory: &str, local_file: &Path) -> StorageResult<()> {
        let mut source = LocalSource::open(local_file).await?;
        let remote = RemotePath::new(normalize(directory), source.file_name.clone());
        let remote_path = remote.full();

        self.client
            .create_file(
                &self.share,
                &remote,
                source.size,
                source.content_type.clone(),
            )
            .await
            .map_err(|e| map_service_error(&e, "upload_file", &remote_path, CREATE_FILE))?;

        let mut ranges = 0u64;
        for range in upload_ranges(source.size, self.chunk_size) {
            let data = source.read_range(range).await.map_err(|e| {
                warn!(
                    source = %source.path.display(),
                    %range,
                    error = %e,
                    "failed to read upload range from local file"
                );
                StorageError::unknown("upload_file")
            })?;

            debug!(path = %remote_path, %range, "writing range");
            self.client
                .put_range(&self.share, &remote, range, data)
                .await
                .map_err(|e| map_service_error(&e, "upload_file", &remote_path, &[]))?;
            ranges += 1;
        }

        info!(
            share = %self.share,
            path = %remote_path,
            size = source.size,
            ranges,
            "file uploaded"
        );
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> StorageResult<()> {
        let remote = RemotePath::split(path);
        debug!(share = %self.share, path = %remote, "deleting share file");

        self.client
            .delete_file(&self.share, &remote)
            .await
            .map_err(|e| map_service_error(&e, "delete_file", &remote.full(), FILE_LOOKUP))
    }

    async fn list_files_in_directory(
        &self,
        directory: &str,
        include_directories: bool,
    ) -> StorageResult<Vec<String>> {
        let directory = normalize(directory);

        let entries = self
            .client
            .list_directory(&self.share, directory)
            .await
            .map_err(|e| {
                map_service_error(&e, "list_files_in_directory", directory, LIST_DIRECTORY)
            })?;

        Ok(entries
            .into_iter()
            .filter(|entry| include_directories || !entry.is_directory)
            .map(|entry| entry.name)
            .collect())
    }

    async fn get_public_file_url(&self, path: &str) -> StorageResult<String> {
        let remote = RemotePath::split(path);

        self.client
            .get_file_properties(&self.share, &remote)
            .await
            .map_err(|e| {
                map_service_error(&e, "get_public_file_url", &remote.full(), FILE_LOOKUP)
            })?;

        Ok(with_signature(
            self.client.file_url(&self.share, &remote),
            &self.shared_access_signature,
        ))
    }

    fn backend_name(&self) -> &'static str {
        "azure_file_share"
    }
}
