//! Shared configuration for Filestore.
//!
//! This crate provides the settings every Filestore binary loads:
//! - Storage backend selection and credentials
//! - Layered loading from files and `FILESTORE__` environment variables

pub mod config;

pub use config::{AppConfig, StorageSettings};
