//! Local upload sources.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

use super::chunk::UploadRange;
use super::error::{StorageError, StorageResult};
use super::path::local_file_name;

/// A local file opened for upload.
///
/// The handle is closed when the source is dropped, on every path.
#[derive(Debug)]
pub struct LocalSource {
    /// Path the source was opened from.
    pub path: PathBuf,
    /// Open handle.
    pub file: File,
    /// Size in bytes at open time.
    pub size: u64,
    /// Remote file name (last path component).
    pub file_name: String,
    /// Detected content type, `None` when detection failed.
    pub content_type: Option<String>,
}

impl LocalSource {
    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns `LocalFileNotFound` if the file does not exist and
    /// `FileCouldNotBeOpened` if it exists but cannot be opened as a file.
    pub async fn open(path: &Path) -> StorageResult<Self> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(StorageError::local_file_not_found(path));
        }

        let file = File::open(path)
            .await
            .map_err(|_| StorageError::file_could_not_be_opened(path))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|_| StorageError::file_could_not_be_opened(path))?;
        if !metadata.is_file() {
            return Err(StorageError::file_could_not_be_opened(path));
        }

        let file_name =
            local_file_name(path).ok_or_else(|| StorageError::local_file_not_found(path))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            size: metadata.len(),
            file_name,
            content_type: detect_content_type(path),
        })
    }

    /// Read the bytes of `range`, seeking explicitly first.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file is shorter than the range
    /// or cannot be read.
    pub async fn read_range(&mut self, range: UploadRange) -> std::io::Result<Bytes> {
        let len = usize::try_from(range.len())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let mut buffer = vec![0u8; len];

        self.file.seek(SeekFrom::Start(range.start)).await?;
        self.file.read_exact(&mut buffer).await?;

        Ok(Bytes::from(buffer))
    }
}

/// Guess the content type of a local file.
///
/// Failure is not an error; the upload proceeds without a content type.
#[must_use]
pub fn detect_content_type(path: &Path) -> Option<String> {
    let guess = mime_guess::from_path(path).first_raw().map(str::to_string);
    if guess.is_none() {
        debug!(path = %path.display(), "content type could not be determined");
    }
    guess
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let err = LocalSource::open(&temp.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::LocalFileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_open_directory_is_not_openable() {
        let temp = TempDir::new().expect("temp dir");
        let err = LocalSource::open(temp.path()).await.unwrap_err();
        assert!(matches!(err, StorageError::FileCouldNotBeOpened { .. }));
    }

    #[tokio::test]
    async fn test_open_reads_size_and_name() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").expect("write");

        let source = LocalSource::open(&path).await.expect("open");
        assert_eq!(source.size, 8);
        assert_eq!(source.file_name, "report.pdf");
        assert_eq!(source.content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_read_range_seeks() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("data.bin");
        std::fs::write(&path, b"0123456789").expect("write");

        let mut source = LocalSource::open(&path).await.expect("open");
        assert_eq!(
            source.read_range(UploadRange::new(6, 9)).await.expect("read"),
            Bytes::from_static(b"6789")
        );
        assert_eq!(
            source.read_range(UploadRange::new(0, 1)).await.expect("read"),
            Bytes::from_static(b"01")
        );
    }

    #[test]
    fn test_detect_content_type_unknown_extension() {
        assert_eq!(detect_content_type(Path::new("archive.unknownext")), None);
        assert_eq!(
            detect_content_type(Path::new("notes.txt")).as_deref(),
            Some("text/plain")
        );
    }
}
