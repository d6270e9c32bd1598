//! Azure client construction errors.

use thiserror::Error;

/// Result type alias using `AzureError`.
pub type AzureResult<T> = Result<T, AzureError>;

/// Errors raised while building an Azure client.
///
/// Request failures are not reported here; they surface as
/// `ServiceError` through the client traits.
#[derive(Debug, Error)]
pub enum AzureError {
    /// Endpoint is not a valid base URL.
    #[error("invalid storage endpoint '{endpoint}': {message}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Parse failure.
        message: String,
    },

    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl AzureError {
    /// Create an invalid endpoint error.
    #[must_use]
    pub fn invalid_endpoint(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}
