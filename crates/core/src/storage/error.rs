//! Storage error types.
//!
//! Every adapter reports failures through [`StorageError`], a closed set of
//! semantic errors. Backend clients report failures through [`ServiceError`],
//! which adapters classify by marker substring and never hand to callers.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `StorageError`.
pub type StorageResult<T> = Result<T, StorageError>;

/// Semantic storage errors shared by all adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Directory or container already exists.
    #[error("directory already exists: {path}")]
    AlreadyExists {
        /// Normalized directory path.
        path: String,
    },

    /// An intermediate segment of the path does not exist.
    #[error("parent directory not found: {path}")]
    ParentNotFound {
        /// Normalized path whose parent is missing.
        path: String,
    },

    /// Directory or container does not exist.
    #[error("directory not found: {path}")]
    NotFound {
        /// Normalized directory path.
        path: String,
    },

    /// Directory is not empty.
    #[error("directory not empty: {path}")]
    NotEmpty {
        /// Normalized directory path.
        path: String,
    },

    /// Upload source does not exist on local disk.
    #[error("local file not found: {}", .path.display())]
    LocalFileNotFound {
        /// Local source path.
        path: PathBuf,
    },

    /// Upload source exists but could not be opened for reading.
    #[error("local file could not be opened: {}", .path.display())]
    FileCouldNotBeOpened {
        /// Local source path.
        path: PathBuf,
    },

    /// Remote file does not exist.
    #[error("remote file not found: {path}")]
    RemoteFileNotFound {
        /// Normalized remote file path.
        path: String,
    },

    /// Backend failure that matched no known error code.
    #[error("unknown file storage error during {operation}")]
    Unknown {
        /// Adapter operation that failed.
        operation: &'static str,
    },

    /// Adapter could not be constructed from the given settings.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an already exists error.
    #[must_use]
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Create a parent not found error.
    #[must_use]
    pub fn parent_not_found(path: impl Into<String>) -> Self {
        Self::ParentNotFound { path: path.into() }
    }

    /// Create a directory not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a directory not empty error.
    #[must_use]
    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::NotEmpty { path: path.into() }
    }

    /// Create a local file not found error.
    #[must_use]
    pub fn local_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::LocalFileNotFound { path: path.into() }
    }

    /// Create a file could not be opened error.
    #[must_use]
    pub fn file_could_not_be_opened(path: impl Into<PathBuf>) -> Self {
        Self::FileCouldNotBeOpened { path: path.into() }
    }

    /// Create a remote file not found error.
    #[must_use]
    pub fn remote_file_not_found(path: impl Into<String>) -> Self {
        Self::RemoteFileNotFound { path: path.into() }
    }

    /// Create an unknown error for the given operation.
    #[must_use]
    pub const fn unknown(operation: &'static str) -> Self {
        Self::Unknown { operation }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns the semantic kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::ParentNotFound { .. } => ErrorKind::ParentNotFound,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotEmpty { .. } => ErrorKind::NotEmpty,
            Self::LocalFileNotFound { .. } => ErrorKind::LocalFileNotFound,
            Self::FileCouldNotBeOpened { .. } => ErrorKind::FileCouldNotBeOpened,
            Self::RemoteFileNotFound { .. } => ErrorKind::RemoteFileNotFound,
            Self::Unknown { .. } | Self::Configuration(_) => ErrorKind::Unknown,
        }
    }
}

/// Semantic error kinds, used as classification targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`StorageError::AlreadyExists`].
    AlreadyExists,
    /// See [`StorageError::ParentNotFound`].
    ParentNotFound,
    /// See [`StorageError::NotFound`].
    NotFound,
    /// See [`StorageError::NotEmpty`].
    NotEmpty,
    /// See [`StorageError::LocalFileNotFound`].
    LocalFileNotFound,
    /// See [`StorageError::FileCouldNotBeOpened`].
    FileCouldNotBeOpened,
    /// See [`StorageError::RemoteFileNotFound`].
    RemoteFileNotFound,
    /// See [`StorageError::Unknown`].
    Unknown,
}

impl ErrorKind {
    /// Returns the stable error code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::ParentNotFound => "PARENT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::NotEmpty => "NOT_EMPTY",
            Self::LocalFileNotFound => "LOCAL_FILE_NOT_FOUND",
            Self::FileCouldNotBeOpened => "FILE_COULD_NOT_BE_OPENED",
            Self::RemoteFileNotFound => "REMOTE_FILE_NOT_FOUND",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Builds the error for this kind, scoped to a remote `path`.
    ///
    /// Local-source kinds carry the path as a `PathBuf`.
    #[must_use]
    pub fn into_error(self, path: &str, operation: &'static str) -> StorageError {
        match self {
            Self::AlreadyExists => StorageError::already_exists(path),
            Self::ParentNotFound => StorageError::parent_not_found(path),
            Self::NotFound => StorageError::not_found(path),
            Self::NotEmpty => StorageError::not_empty(path),
            Self::LocalFileNotFound => StorageError::local_file_not_found(path),
            Self::FileCouldNotBeOpened => StorageError::file_could_not_be_opened(path),
            Self::RemoteFileNotFound => StorageError::remote_file_not_found(path),
            Self::Unknown => StorageError::unknown(operation),
        }
    }
}

/// Failure reported by a backend client.
///
/// `message` is the provider's response payload; for Azure this is the XML
/// error body containing `<Code>..</Code>`.
#[derive(Debug, Clone, Error)]
#[error("storage service error (status {}): {message}", display_status(.status))]
pub struct ServiceError {
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Raw provider message.
    pub message: String,
}

impl ServiceError {
    /// Create an error from a provider response.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an error for a request that produced no response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Classify this error against an operation's marker table.
    #[must_use]
    pub fn classify(&self, markers: &[(&str, ErrorKind)]) -> ErrorKind {
        classify(&self.message, markers)
    }
}

#[allow(clippy::ref_option)]
fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// Provider error code markers, as they appear in Azure error bodies.
pub mod markers {
    /// Directory or share resource already exists.
    pub const RESOURCE_ALREADY_EXISTS: &str = "<Code>ResourceAlreadyExists</Code>";
    /// Parent directory is missing.
    pub const PARENT_NOT_FOUND: &str = "<Code>ParentNotFound</Code>";
    /// Directory or file is missing.
    pub const RESOURCE_NOT_FOUND: &str = "<Code>ResourceNotFound</Code>";
    /// Directory still has entries.
    pub const DIRECTORY_NOT_EMPTY: &str = "<Code>DirectoryNotEmpty</Code>";
    /// Container already exists.
    pub const CONTAINER_ALREADY_EXISTS: &str = "<Code>ContainerAlreadyExists</Code>";
    /// Container is missing.
    pub const CONTAINER_NOT_FOUND: &str = "<Code>ContainerNotFound</Code>";
    /// Blob is missing.
    pub const BLOB_NOT_FOUND: &str = "<Code>BlobNotFound</Code>";
}

/// Classify a raw backend message.
///
/// Returns the kind of the first marker contained in `raw`, or
/// [`ErrorKind::Unknown`] when none matches.
#[must_use]
pub fn classify(raw: &str, markers: &[(&str, ErrorKind)]) -> ErrorKind {
    markers
        .iter()
        .find(|(marker, _)| raw.contains(marker))
        .map_or(ErrorKind::Unknown, |(_, kind)| *kind)
}
