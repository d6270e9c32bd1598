//! Azure Blob Storage adapter.
//!
//! The first path segment names a container. Remaining segments form a
//! virtual directory, expressed as a blob name prefix, so `reports/2024/a.pdf`
//! is blob `2024/a.pdf` in container `reports`.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use super::adapter::{FileStorageAdapter, map_service_error, with_signature};
use super::client::BlobClient;
use super::error::{ErrorKind, StorageError, StorageResult, markers};
use super::path::{RemotePath, SEPARATOR, join, normalize};
use super::source::LocalSource;

const CREATE_CONTAINER: &[(&str, ErrorKind)] = &[
    (markers::CONTAINER_ALREADY_EXISTS, ErrorKind::AlreadyExists),
    (markers::RESOURCE_ALREADY_EXISTS, ErrorKind::AlreadyExists),
];

const CONTAINER_LOOKUP: &[(&str, ErrorKind)] =
    &[(markers::CONTAINER_NOT_FOUND, ErrorKind::NotFound)];

/// A file in a missing container is reported as a missing file, as on the
/// hierarchical backends.
const BLOB_LOOKUP: &[(&str, ErrorKind)] = &[
    (markers::BLOB_NOT_FOUND, ErrorKind::RemoteFileNotFound),
    (markers::CONTAINER_NOT_FOUND, ErrorKind::RemoteFileNotFound),
];

const DIRECTORY_BLOB_LOOKUP: &[(&str, ErrorKind)] = &[
    (markers::BLOB_NOT_FOUND, ErrorKind::NotFound),
    (markers::CONTAINER_NOT_FOUND, ErrorKind::NotFound),
];

/// A directory path resolved to a container and a blob name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlobLocation<'a> {
    container: &'a str,
    /// Virtual directory inside the container, without separators at
    /// either end. Empty at the container root.
    directory: &'a str,
}

impl<'a> BlobLocation<'a> {
    fn parse(path: &'a str) -> Self {
        let path = normalize(path);
        match path.split_once(SEPARATOR) {
            Some((container, directory)) => Self {
                container,
                directory: normalize(directory),
            },
            None => Self {
                container: path,
                directory: "",
            },
        }
    }

    /// Listing prefix, ending with a separator unless at the root.
    fn prefix(&self) -> String {
        if self.directory.is_empty() {
            String::new()
        } else {
            format!("{}{SEPARATOR}", self.directory)
        }
    }

    fn blob_name(&self, name: &str) -> String {
        join(self.directory, name)
    }
}

/// Adapter over an Azure storage account's blob service.
#[derive(Debug)]
pub struct AzureBlobAdapter<C> {
    client: C,
    shared_access_signature: String,
}

impl<C: BlobClient> AzureBlobAdapter<C> {
    /// Create an adapter.
    ///
    /// `shared_access_signature` is appended to public URLs.
    pub fn new(client: C, shared_access_signature: impl Into<String>) -> Self {
        Self {
            client,
            shared_access_signature: shared_access_signature.into(),
        }
    }

    /// Delete the blobs directly under a virtual directory.
    ///
    /// Nested virtual directories are left in place.
    async fn delete_prefix(&self, location: &BlobLocation<'_>, path: &str) -> StorageResult<()> {
        let entries = self
            .client
            .list_blobs(location.container, &location.prefix())
            .await
            .map_err(|e| map_service_error(&e, "delete_directory", path, CONTAINER_LOOKUP))?;
        if entries.is_empty() {
            return Err(StorageError::not_found(path));
        }

        let mut deleted = 0usize;
        for entry in entries.iter().filter(|entry| !entry.is_directory) {
            self.client
                .delete_blob(location.container, &entry.name)
                .await
                .map_err(|e| {
                    map_service_error(&e, "delete_directory", path, DIRECTORY_BLOB_LOOKUP)
                })?;
            deleted += 1;
        }

        debug!(path, deleted, "virtual directory deleted");
        Ok(())
    }
}

#[async_trait]
impl<C: BlobClient> FileStorageAdapter for AzureBlobAdapter<C> {
    async fn create_directory(&self, path: &str) -> StorageResult<()> {
        let location = BlobLocation::parse(path);
        if location.container.is_empty() {
            return Err(StorageError::not_found(normalize(path)));
        }
        debug!(
            container = location.container,
            directory = location.directory,
            "creating container"
        );

        match self.client.create_container(location.container).await {
            Ok(()) => Ok(()),
            Err(e) => match map_service_error(
                &e,
                "create_directory",
                location.container,
                CREATE_CONTAINER,
            ) {
                StorageError::AlreadyExists { .. } => Ok(()),
                other => Err(other),
            },
        }
    }

    async fn delete_directory(&self, path: &str) -> StorageResult<()> {
        let location = BlobLocation::parse(path);
        let normalized = normalize(path);
        if location.container.is_empty() {
            return Err(StorageError::not_found(normalized));
        }

        if !location.directory.is_empty() {
            return self.delete_prefix(&location, normalized).await;
        }

        debug!(container = location.container, "deleting container");
        self.client
            .delete_container(location.container)
            .await
            .map_err(|e| map_service_error(&e, "delete_directory", normalized, CONTAINER_LOOKUP))
    }

    async fn upload_file(&self, directory: &str, local_file: &Path) -> StorageResult<()> {
        let source = LocalSource::open(local_file).await?;
        let location = BlobLocation::parse(directory);
        if location.container.is_empty() {
            return Err(StorageError::not_found(normalize(directory)));
        }

        let blob = location.blob_name(&source.file_name);
        let path = join(location.container, &blob);

        self.client
            .put_blob(
                location.container,
                &blob,
                source.file,
                source.size,
                source.content_type,
            )
            .await
            .map_err(|e| map_service_error(&e, "upload_file", &path, CONTAINER_LOOKUP))?;

        info!(container = location.container, blob = %blob, size = source.size, "blob uploaded");
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> StorageResult<()> {
        let remote = RemotePath::split(path);
        let location = BlobLocation::parse(&remote.directory);
        if location.container.is_empty() {
            return Err(StorageError::remote_file_not_found(remote.full()));
        }

        let blob = location.blob_name(&remote.name);
        debug!(container = location.container, blob = %blob, "deleting blob");

        self.client
            .delete_blob(location.container, &blob)
            .await
            .map_err(|e| map_service_error(&e, "delete_file", &remote.full(), BLOB_LOOKUP))
    }

    async fn list_files_in_directory(
        &self,
        directory: &str,
        include_directories: bool,
    ) -> StorageResult<Vec<String>> {
        let location = BlobLocation::parse(directory);
        if location.container.is_empty() {
            return Err(StorageError::not_found(normalize(directory)));
        }
        let prefix = location.prefix();

        let entries = self
            .client
            .list_blobs(location.container, &prefix)
            .await
            .map_err(|e| {
                map_service_error(
                    &e,
                    "list_files_in_directory",
                    normalize(directory),
                    CONTAINER_LOOKUP,
                )
            })?;

        Ok(entries
            .into_iter()
            .filter(|entry| include_directories || !entry.is_directory)
            .map(|entry| {
                let relative = entry.name.strip_prefix(&prefix).unwrap_or(&entry.name);
                relative.trim_end_matches(SEPARATOR).to_string()
            })
            .filter(|name| !name.is_empty())
            .collect())
    }

    async fn get_public_file_url(&self, path: &str) -> StorageResult<String> {
        let remote = RemotePath::split(path);
        let location = BlobLocation::parse(&remote.directory);
        if location.container.is_empty() {
            return Err(StorageError::remote_file_not_found(remote.full()));
        }

        let blob = location.blob_name(&remote.name);
        self.client
            .get_blob_properties(location.container, &blob)
            .await
            .map_err(|e| {
                map_service_error(&e, "get_public_file_url", &remote.full(), BLOB_LOOKUP)
            })?;

        Ok(with_signature(
            self.client.blob_url(location.container, &blob),
            &self.shared_access_signature,
        ))
    }

    fn backend_name(&self) -> &'static str {
        "azure_blob"
    }
}
