//! Local filesystem adapter.
//!
//! Files live under a root directory that sits inside a web server's
//! `public` folder; public URLs are built from the configured origin and the
//! part of the root after `public`.

use std::ffi::OsStr;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tracing::{debug, warn};

use super::adapter::FileStorageAdapter;
use super::error::{StorageError, StorageResult};
use super::path::{RemotePath, SEPARATOR, is_contained, join, normalize};
use super::source::LocalSource;

/// Permission bits applied to every directory this adapter creates.
pub const DIRECTORY_MODE: u32 = 0o777;

const PUBLIC_FOLDER: &str = "public";

/// Adapter storing files under a local root directory.
#[derive(Debug, Clone)]
pub struct LocalAdapter {
    root: PathBuf,
    origin_url: String,
    public_prefix: String,
}

impl LocalAdapter {
    /// Create a new local adapter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `root` does not contain a `public`
    /// folder, since no public URL could be derived from it.
    pub fn new(root: impl Into<PathBuf>, origin_url: impl Into<String>) -> StorageResult<Self> {
        let root = root.into();
        let public_prefix = public_prefix(&root).ok_or_else(|| {
            StorageError::configuration(format!(
                "local storage root '{}' must contain the '{PUBLIC_FOLDER}' folder",
                root.display()
            ))
        })?;

        Ok(Self {
            root,
            origin_url: origin_url.into().trim_end_matches('/').to_string(),
            public_prefix,
        })
    }

    /// Root directory of this adapter.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller path under the root, or `None` if it would leave it.
    fn full_path(&self, path: &str) -> Option<PathBuf> {
        if !is_contained(path) {
            warn!(path, "rejected path outside the storage root");
            return None;
        }

        let path = normalize(path);
        if path.is_empty() {
            Some(self.root.clone())
        } else {
            Some(self.root.join(path))
        }
    }

    async fn ensure_root(&self) -> StorageResult<()> {
        if fs::try_exists(&self.root).await.unwrap_or(false) {
            return Ok(());
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_failure("create_directory", &self.root, &e))?;
        set_directory_mode(&self.root)
            .await
            .map_err(|e| io_failure("create_directory", &self.root, &e))
    }
}

/// URL path of `root` below its first `public` component, `""` when the
/// root is the `public` folder itself.
fn public_prefix(root: &Path) -> Option<String> {
    let mut components = root.components();
    components.find(|component| *component == Component::Normal(OsStr::new(PUBLIC_FOLDER)))?;

    Some(
        components
            .map(|component| format!("{SEPARATOR}{}", component.as_os_str().to_string_lossy()))
            .collect(),
    )
}

#[async_trait]
impl FileStorageAdapter for LocalAdapter {
    async fn create_directory(&self, path: &str) -> StorageResult<()> {
        let normalized = normalize(path);
        let full_path = self
            .full_path(normalized)
            .ok_or_else(|| StorageError::parent_not_found(normalized))?;
        self.ensure_root().await?;
        debug!(path = normalized, "creating local directory");

        if fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(StorageError::already_exists(normalized));
        }

        match fs::create_dir(&full_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(StorageError::parent_not_found(normalized));
            }
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => {
                return Err(StorageError::already_exists(normalized));
            }
            Err(e) => return Err(io_failure("create_directory", &full_path, &e)),
        }

        // umask may have narrowed the mode chosen by create_dir
        set_directory_mode(&full_path)
            .await
            .map_err(|e| io_failure("create_directory", &full_path, &e))
    }

    async fn delete_directory(&self, path: &str) -> StorageResult<()> {
        let normalized = normalize(path);
        let full_path = self
            .full_path(normalized)
            .ok_or_else(|| StorageError::not_found(normalized))?;
        debug!(path = normalized, "deleting local directory");

        if !fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(StorageError::not_found(normalized));
        }

        fs::remove_dir(&full_path).await.map_err(|e| match e.kind() {
            IoErrorKind::DirectoryNotEmpty => StorageError::not_empty(normalized),
            IoErrorKind::NotFound | IoErrorKind::NotADirectory => {
                StorageError::not_found(normalized)
            }
            _ => io_failure("delete_directory", &full_path, &e),
        })
    }

    async fn upload_file(&self, directory: &str, local_file: &Path) -> StorageResult<()> {
        let mut source = LocalSource::open(local_file).await?;

        let directory = normalize(directory);
        let destination_dir = self
            .full_path(directory)
            .ok_or_else(|| StorageError::parent_not_found(directory))?;
        if !fs::metadata(&destination_dir)
            .await
            .is_ok_and(|meta| meta.is_dir())
        {
            return Err(StorageError::parent_not_found(directory));
        }

        let destination = destination_dir.join(&source.file_name);
        debug!(
            source = %source.path.display(),
            destination = %join(directory, &source.file_name),
            size = source.size,
            "copying file into local storage"
        );

        let mut target = File::create(&destination)
            .await
            .map_err(|e| io_failure("upload_file", &destination, &e))?;
        tokio::io::copy(&mut source.file, &mut target)
            .await
            .map_err(|e| io_failure("upload_file", &destination, &e))?;

        Ok(())
    }

    async fn delete_file(&self, path: &str) -> StorageResult<()> {
        let remote = RemotePath::split(path);
        let full_path = self
            .full_path(&remote.full())
            .ok_or_else(|| StorageError::remote_file_not_found(remote.full()))?;
        debug!(path = %remote, "deleting local file");

        // a missing parent directory is reported as a missing file
        if !fs::metadata(&full_path)
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            return Err(StorageError::remote_file_not_found(remote.full()));
        }

        fs::remove_file(&full_path).await.map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                StorageError::remote_file_not_found(remote.full())
            } else {
                io_failure("delete_file", &full_path, &e)
            }
        })
    }

    async fn list_files_in_directory(
        &self,
        directory: &str,
        include_directories: bool,
    ) -> StorageResult<Vec<String>> {
        let normalized = normalize(directory);
        let full_path = self
            .full_path(normalized)
            .ok_or_else(|| StorageError::not_found(normalized))?;

        let mut read_dir = fs::read_dir(&full_path).await.map_err(|e| match e.kind() {
            IoErrorKind::NotFound | IoErrorKind::NotADirectory => {
                StorageError::not_found(normalized)
            }
            _ => io_failure("list_files_in_directory", &full_path, &e),
        })?;

        let mut results = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| io_failure("list_files_in_directory", &full_path, &e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|file_type| file_type.is_dir())
                .unwrap_or(false);

            if !is_dir || include_directories {
                results.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        Ok(results)
    }

    async fn get_public_file_url(&self, path: &str) -> StorageResult<String> {
        let normalized = normalize(path);
        let full_path = self
            .full_path(normalized)
            .ok_or_else(|| StorageError::remote_file_not_found(normalized))?;

        if !fs::metadata(&full_path)
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            return Err(StorageError::remote_file_not_found(normalized));
        }

        Ok(format!(
            "{}{}/{}",
            self.origin_url, self.public_prefix, normalized
        ))
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

fn io_failure(operation: &'static str, path: &Path, err: &std::io::Error) -> StorageError {
    warn!(operation, path = %path.display(), error = %err, "local filesystem operation failed");
    StorageError::unknown(operation)
}

#[cfg(unix)]
async fn set_directory_mode(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(DIRECTORY_MODE)).await
}

#[cfg(not(unix))]
async fn set_directory_mode(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
