//! File storage service facade.

use std::path::Path;
use std::sync::Arc;

use super::adapter::FileStorageAdapter;
use super::error::StorageResult;

/// Entry point for file storage operations.
///
/// Holds exactly one adapter, chosen at construction, and forwards every
/// call to it unchanged.
#[derive(Clone)]
pub struct FileStorageService {
    adapter: Arc<dyn FileStorageAdapter>,
}

impl FileStorageService {
    /// Create a service over `adapter`.
    pub fn new(adapter: impl FileStorageAdapter + 'static) -> Self {
        Self {
            adapter: Arc::new(adapter),
        }
    }

    /// Create a service over an already shared adapter.
    #[must_use]
    pub fn from_shared(adapter: Arc<dyn FileStorageAdapter>) -> Self {
        Self { adapter }
    }

    /// The adapter this service delegates to.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn FileStorageAdapter> {
        &self.adapter
    }

    /// Create a directory.
    ///
    /// # Errors
    ///
    /// See [`FileStorageAdapter::create_directory`].
    pub async fn create_directory(&self, path: &str) -> StorageResult<()> {
        self.adapter.create_directory(path).await
    }

    /// Delete a directory.
    ///
    /// # Errors
    ///
    /// See [`FileStorageAdapter::delete_directory`].
    pub async fn delete_directory(&self, path: &str) -> StorageResult<()> {
        self.adapter.delete_directory(path).await
    }

    /// Upload a local file into a remote directory.
    ///
    /// # Errors
    ///
    /// See [`FileStorageAdapter::upload_file`].
    pub async fn upload_file(&self, directory: &str, local_file: &Path) -> StorageResult<()> {
        self.adapter.upload_file(directory, local_file).await
    }

    /// Delete a remote file.
    ///
    /// # Errors
    ///
    /// See [`FileStorageAdapter::delete_file`].
    pub async fn delete_file(&self, path: &str) -> StorageResult<()> {
        self.adapter.delete_file(path).await
    }

    /// List the entries of a directory.
    ///
    /// # Errors
    ///
    /// See [`FileStorageAdapter::list_files_in_directory`].
    pub async fn list_files_in_directory(
        &self,
        directory: &str,
        include_directories: bool,
    ) -> StorageResult<Vec<String>> {
        self.adapter
            .list_files_in_directory(directory, include_directories)
            .await
    }

    /// Public URL of a remote file.
    ///
    /// # Errors
    ///
    /// See [`FileStorageAdapter::get_public_file_url`].
    pub async fn get_public_file_url(&self, path: &str) -> StorageResult<String> {
        self.adapter.get_public_file_url(path).await
    }
}

impl std::fmt::Debug for FileStorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorageService")
            .field("backend", &self.adapter.backend_name())
            .finish()
    }
}
