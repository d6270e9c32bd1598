//! Azure Storage REST clients for Filestore.
//!
//! [`ShareRestClient`] and [`BlobRestClient`] implement the backend client
//! traits of `filestore-core` over the Azure Storage REST API. Requests are
//! authorized by appending a pre-issued shared access signature; no account
//! keys are handled here.

mod blob;
mod error;
mod listing;
mod request;
mod share;

pub use blob::BlobRestClient;
pub use error::{AzureError, AzureResult};
pub use request::{API_VERSION, Endpoint, default_endpoint};
pub use share::ShareRestClient;
