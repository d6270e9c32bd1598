//! Backend-agnostic file storage.
//!
//! One contract, [`FileStorageAdapter`], over three backends:
//! - Local filesystem under a web server's `public` folder
//! - Azure File Share (hierarchical, chunked range uploads)
//! - Azure Blob Storage (containers with virtual directories)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      FileStorageService                          │
//! │                  (one adapter, fixed at build)                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ LocalAdapter        │ AzureFileAdapter     │ AzureBlobAdapter    │
//! │ tokio::fs           │ ShareClient          │ BlobClient          │
//! ├─────────────────────┴──────────────────────┴─────────────────────┤
//! │        classify(message, markers) -> StorageError                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend failures are classified by `<Code>..</Code>` markers and
//! surface only as [`StorageError`]; raw provider messages are logged and
//! dropped.

mod adapter;
mod azure_blob;
mod azure_file;
mod chunk;
mod client;
mod error;
mod local;
mod path;
mod service;
mod source;

#[cfg(test)]
mod chunk_props;

pub use adapter::FileStorageAdapter;
pub use azure_blob::AzureBlobAdapter;
pub use azure_file::AzureFileAdapter;
pub use chunk::{MAX_RANGE_SIZE, UploadRange, UploadRanges, upload_ranges};
pub use client::{BlobClient, RemoteEntry, RemoteProperties, ShareClient};
pub use error::{ErrorKind, ServiceError, StorageError, StorageResult, classify, markers};
pub use local::{DIRECTORY_MODE, LocalAdapter};
pub use path::{RemotePath, is_contained, normalize};
pub use service::FileStorageService;
pub use source::{LocalSource, detect_content_type};
