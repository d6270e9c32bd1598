//! Endpoint handling, request signing and response checking.

use filestore_core::storage::ServiceError;
use reqwest::header::HeaderMap;
use reqwest::{Response, Url};

use crate::error::{AzureError, AzureResult};

/// Storage REST API version sent with every request.
pub const API_VERSION: &str = "2022-11-02";

pub(crate) const VERSION_HEADER: &str = "x-ms-version";
pub(crate) const ERROR_CODE_HEADER: &str = "x-ms-error-code";

/// Default public endpoint of an account's `file` or `blob` service.
#[must_use]
pub fn default_endpoint(account: &str, service: &str) -> String {
    format!("https://{account}.{service}.core.windows.net")
}

/// A service endpoint together with the signature used to authorize calls.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    shared_access_signature: String,
}

impl Endpoint {
    /// Parse a service endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if `endpoint` is not an absolute base URL.
    pub fn parse(endpoint: &str, shared_access_signature: &str) -> AzureResult<Self> {
        let base =
            Url::parse(endpoint).map_err(|e| AzureError::invalid_endpoint(endpoint, e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(AzureError::invalid_endpoint(endpoint, "not a base URL"));
        }

        Ok(Self {
            base,
            shared_access_signature: shared_access_signature.trim_start_matches('?').to_string(),
        })
    }

    /// Unsigned URL of a resource.
    ///
    /// Each part may contain `/` separators; empty segments are dropped and
    /// every segment is percent-encoded.
    #[must_use]
    pub fn resource_url(&self, parts: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for part in parts {
                segments.extend(part.split('/').filter(|s| !s.is_empty()));
            }
        }
        url
    }

    /// Signed URL of a resource with operation query parameters.
    #[must_use]
    pub fn signed_url(&self, parts: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.resource_url(parts);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        if !self.shared_access_signature.is_empty() {
            let query = match url.query() {
                Some(query) if !query.is_empty() => {
                    format!("{query}&{}", self.shared_access_signature)
                }
                _ => self.shared_access_signature.clone(),
            };
            url.set_query(Some(&query));
        }
        url
    }
}

/// Pass successful responses through; turn failures into a `ServiceError`
/// carrying the provider's error body.
pub(crate) async fn check(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = error_code(response.headers());
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::new(
        status.as_u16(),
        error_message(&body, code.as_deref()),
    ))
}

/// Map a failed send to a `ServiceError` without status.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn transport(err: reqwest::Error) -> ServiceError {
    ServiceError::transport(err.to_string())
}

fn error_code(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ERROR_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Error message with a `<Code>` element, taken from the body or rebuilt
/// from the error code header (`HEAD` responses have no body).
pub(crate) fn error_message(body: &str, code: Option<&str>) -> String {
    match code {
        Some(code) if !body.contains("<Code>") => format!("{body}<Code>{code}</Code>"),
        _ => body.to_string(),
    }
}

/// Parse a numeric response header.
pub(crate) fn header_u64(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Read a string response header.
pub(crate) fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
