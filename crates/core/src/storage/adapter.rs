//! The adapter contract shared by every storage backend.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

use super::error::{ErrorKind, ServiceError, StorageError, StorageResult};

/// Uniform file storage operations over one backend.
///
/// Paths are backend-relative and may carry a leading `/`. Every failure is
/// reported as a [`StorageError`]; backend-specific errors never cross this
/// boundary.
#[async_trait]
pub trait FileStorageAdapter: Send + Sync {
    /// Create a directory, e.g. `test` or `test1/test2`.
    async fn create_directory(&self, path: &str) -> StorageResult<()>;

    /// Delete a directory.
    async fn delete_directory(&self, path: &str) -> StorageResult<()>;

    /// Upload `local_file` into `directory` under its own file name.
    async fn upload_file(&self, directory: &str, local_file: &Path) -> StorageResult<()>;

    /// Delete a remote file.
    async fn delete_file(&self, path: &str) -> StorageResult<()>;

    /// List entry names in `directory`; directories only when
    /// `include_directories` is set.
    async fn list_files_in_directory(
        &self,
        directory: &str,
        include_directories: bool,
    ) -> StorageResult<Vec<String>>;

    /// Publicly accessible URL of an existing remote file.
    async fn get_public_file_url(&self, path: &str) -> StorageResult<String>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Translate a backend error through an operation's marker table.
///
/// Unrecognized errors are logged with the raw message and surface as
/// [`StorageError::Unknown`].
pub(crate) fn map_service_error(
    err: &ServiceError,
    operation: &'static str,
    path: &str,
    markers: &[(&str, ErrorKind)],
) -> StorageError {
    let kind = err.classify(markers);
    if kind == ErrorKind::Unknown {
        warn!(
            operation,
            path,
            status = ?err.status,
            message = %err.message,
            "unrecognized storage backend error"
        );
    }
    kind.into_error(path, operation)
}

/// Append a shared access signature query string to a URL.
pub(crate) fn with_signature(url: String, shared_access_signature: &str) -> String {
    let signature = shared_access_signature.trim_start_matches('?');
    if signature.is_empty() {
        url
    } else {
        format!("{url}?{signature}")
    }
}
