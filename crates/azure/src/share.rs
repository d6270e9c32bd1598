//! Azure File Share REST client.

use async_trait::async_trait;
use bytes::Bytes;
use filestore_core::storage::{
    RemoteEntry, RemotePath, RemoteProperties, ServiceError, ShareClient, UploadRange,
};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, Request};
use tracing::debug;

use crate::error::AzureResult;
use crate::listing::parse_share_listing;
use crate::request::{
    API_VERSION, Endpoint, VERSION_HEADER, check, default_endpoint, header_string, header_u64,
    transport,
};

const RESTYPE_DIRECTORY: (&str, &str) = ("restype", "directory");

/// REST client for the File service of one storage account.
#[derive(Debug, Clone)]
pub struct ShareRestClient {
    http: Client,
    endpoint: Endpoint,
}

impl ShareRestClient {
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
        Self::new(&default_endpoint(account, "file"), shared_access_signature)
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

    pub(crate) fn create_directory_request(
        &self,
        share: &str,
        path: &str,
    ) -> reqwest::Result<Request> {
        self.request(Method::PUT, &[share, path], &[RESTYPE_DIRECTORY])
            .header(CONTENT_LENGTH, 0)
            .build()
    }

    pub(crate) fn delete_directory_request(
        &self,
        share: &str,
        path: &str,
    ) -> reqwest::Result<Request> {
        self.request(Method::DELETE, &[share, path], &[RESTYPE_DIRECTORY])
            .build()
    }

    pub(crate) fn create_file_request(
        &self,
        share: &str,
        file: &RemotePath,
        size: u64,
        content_type: Option<&str>,
    ) -> reqwest::Result<Request> {
        let mut builder = self
            .request(Method::PUT, &[share, file.directory.as_str(), file.name.as_str()], &[])
            .header("x-ms-type", "file")
            .header("x-ms-content-length", size)
            .header(CONTENT_LENGTH, 0);
        if let Some(content_type) = content_type {
            builder = builder.header("x-ms-content-type", content_type);
        }
        builder.build()
    }

    pub(crate) fn put_range_request(
        &self,
        share: &str,
        file: &RemotePath,
        range: UploadRange,
        data: Bytes,
    ) -> reqwest::Result<Request> {
        self.request(
            Method::PUT,
            &[share, file.directory.as_str(), file.name.as_str()],
            &[("comp", "range")],
        )
        .header("x-ms-range", range.header_value())
        .header("x-ms-write", "update")
        .header(CONTENT_LENGTH, data.len())
        .body(data)
        .build()
    }

    pub(crate) fn list_request(
        &self,
        share: &str,
        path: &str,
        marker: Option<&str>,
    ) -> reqwest::Result<Request> {
        let mut params = vec![RESTYPE_DIRECTORY, ("comp", "list")];
        if let Some(marker) = marker {
            params.push(("marker", marker));
        }
        self.request(Method::GET, &[share, path], &params).build()
    }

    async fn send(&self, request: Request) -> Result<reqwest::Response, ServiceError> {
        debug!(method = %request.method(), path = request.url().path(), "file service request");
        let response = self.http.execute(request).await.map_err(transport)?;
        check(response).await
    }
}

#[async_trait]
impl ShareClient for ShareRestClient {
    async fn create_directory(&self, share: &str, path: &str) -> Result<(), ServiceError> {
        let request = self
            .create_directory_request(share, path)
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn delete_directory(&self, share: &str, path: &str) -> Result<(), ServiceError> {
        let request = self
            .delete_directory_request(share, path)
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn create_file(
        &self,
        share: &str,
        file: &RemotePath,
        size: u64,
        content_type: Option<String>,
    ) -> Result<(), ServiceError> {
        let request = self
            .create_file_request(share, file, size, content_type.as_deref())
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn put_range(
        &self,
        share: &str,
        file: &RemotePath,
        range: UploadRange,
        data: Bytes,
    ) -> Result<(), ServiceError> {
        let request = self
            .put_range_request(share, file, range, data)
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn delete_file(&self, share: &str, file: &RemotePath) -> Result<(), ServiceError> {
        let request = self
            .request(Method::DELETE, &[share, file.directory.as_str(), file.name.as_str()], &[])
            .build()
            .map_err(transport)?;
        self.send(request).await.map(drop)
    }

    async fn list_directory(
        &self,
        share: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, ServiceError> {
        let mut entries = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let request = self
                .list_request(share, path, marker.as_deref())
                .map_err(transport)?;
            let body = self
                .send(request)
                .await?
                .text()
                .await
                .map_err(transport)?;

            let page = parse_share_listing(&body)?;
            entries.extend(page.entries);
            match page.next_marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn get_file_properties(
        &self,
        share: &str,
        file: &RemotePath,
    ) -> Result<RemoteProperties, ServiceError> {
        let request = self
            .request(Method::HEAD, &[share, file.directory.as_str(), file.name.as_str()], &[])
            .build()
            .map_err(transport)?;
        let response = self.send(request).await?;

        Ok(RemoteProperties {
            content_length: header_u64(response.headers(), CONTENT_LENGTH.as_str()),
            content_type: header_string(response.headers(), CONTENT_TYPE.as_str()),
        })
    }

    fn file_url(&self, share: &str, file: &RemotePath) -> String {
        self.endpoint
            .resource_url(&[share, file.directory.as_str(), file.name.as_str()])
            .into()
    }
}
