//! Core storage logic for Filestore.
//!
//! This crate contains the adapter contract, the three storage adapters, the
//! chunked upload algorithm and the error taxonomy, with ZERO HTTP
//! dependencies. Remote backends are reached through the client traits in
//! [`storage`], implemented by `filestore-azure`.
//!
//! # Modules
//!
//! - `storage` - Adapters, facade, chunked uploads and error classification

pub mod storage;
