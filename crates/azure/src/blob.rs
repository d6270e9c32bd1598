//! Azure Blob Storage REST client.

use async_trait::async_trait;
use filestore_core::storage::{BlobClient, RemoteEntry, RemoteProperties, ServiceError};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Method, Request};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::AzureResult;
use crate::listing::parse_blob_listing;
use crate::request::{
    API_VERSION, Endpoint, VERSION_HEADER, check, default_endpoint, header_string, header_u64,
    transport,
};

const RESTYPE_CONTAINER: (&str, &str) = ("restype", "container");

/// REST client for the Blob service of one storage account.
#[derive(Debug, Clone)]
pub struct BlobRestClient {
    http: Client,
    endpoint: Endpoint,
}

impl BlobRestClient {
    /// Create a client for an explicit endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client cannot
    /// be built.
    pub fn new(endpoint: &str, shared_access_signature: &str) -> AzureResult<Self> {
        Ok(Self {
            http: Client::builder().build()?,
            endpoint: Endpoint::parse(endpoint, shared_access_signature)?,
        })
    }

    /// Create a client for the default endpoint of `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn for_account(account: &str, shared_access_signature: &str) -> AzureResult<Self> {
        Self::new(&default_endpoint(account, "blob"), shared_access_signature)
    }

    fn request(
        &self,
        method: Method,
        parts: &[&str],
        params: &[(&str, &str)],
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.endpoint.signed_url(parts, params))
            .header(VERSION_HEADER, API_VERSION)
    }

    pub(crate) fn put_blob_request(
        &self,
        container: &str,
        blob: &str,
        body: Body,
        content_length: u64,
        content_type: Option<&str>,
    ) -> reqwest::Result<Request> {
        let mut builder = self
            .request(Method::PUT, &[container, blob], &[])
            .header("x-ms-blob-type", "BlockBlob")
            .header(CONTENT_LENGTH, content_length);
        if let Some(content_type) = content_type {
            builder = builder.header("x-ms-blob-content-type", content_type);
        }
        builder.body(body).build()
    }

    pub(crate) fn list_request(
        &self,
        container: &str,
        prefix: &str,
        marker: Option<&str>,
    ) -> reqwest::Result<Request> {
        let mut params = vec![RESTYPE_CONTAINER, ("comp", "list"), ("delimiter", "/")];
        if !prefix.is_empty() {
            params.push(("prefix", prefix));
        }
        if let Some(marker) = marker {
            params.push(("marker", marker));
        }
        self.request(Method::GET, &[container], &params).build()
    }

    async fn send(&self, request: Request) -> Result<reqwest::Response, ServiceError> {
        debug!(method = %request.method(), path = request.url().path(), "blob service request");
        let response = self.http.execute(request).await.map_err(transport)?;
        check(response).await
    }
}

#[async_trait]
impl BlobClient for BlobRestClient {
    async fn create_container(&self, container: &str) -> Result<(), ServiceError> {
        let request = self
            .request(Method::PUT, &[container], &[RESTYPE_CONTAINER])
            .header(CONTENT_LENGTH, 0)
            .build()
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn delete_container(&self, container: &str) -> Result<(), ServiceError> {
        let request = self
            .request(Method::DELETE, &[container], &[RESTYPE_CONTAINER])
            .build()
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn put_blob(
        &self,
        container: &str,
        blob: &str,
        body: File,
        content_length: u64,
        content_type: Option<String>,
    ) -> Result<(), ServiceError> {
        let body = Body::wrap_stream(ReaderStream::new(body));
        let request = self
            .put_blob_request(
                container,
                blob,
                body,
                content_length,
                content_type.as_deref(),
            )
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn delete_blob(&self, container: &str, blob: &str) -> Result<(), ServiceError> {
        let request = self
            .request(Method::DELETE, &[container, blob], &[])
            .build()
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn list_blobs(
        &self,
        container: &str,
        prefix: &str,
    ) -> Result<Vec<RemoteEntry>, ServiceError> {
        let mut entries = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let request = self
                .list_request(container, prefix, marker.as_deref())
                .map_err(transport)?;
            let body = self
                .send(request)
                .await?
                .text()
                .await
                .map_err(transport)?;

            let page = parse_blob_listing(&body)?;
            entries.extend(page.entries);
            match page.next_marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn get_blob_properties(
        &self,
        container: &str,
        blob: &str,
    ) -> Result<RemoteProperties, ServiceError> {
        let request = self
            .request(Method::HEAD, &[container, blob], &[])
            .build()
            .map_err(transport)?;
        let response = self.send(request).await?;

        Ok(RemoteProperties {
            content_length: header_u64(response.headers(), CONTENT_LENGTH.as_str()),
            content_type: header_string(response.headers(), CONTENT_TYPE.as_str()),
        })
    }

    fn blob_url(&self, container: &str, blob: &str) -> String {
        self.endpoint.resource_url(&[container, blob]).into()
    }
}
