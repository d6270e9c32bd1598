//! Builds the storage service selected by configuration.

use anyhow::Result;
use filestore_azure::{BlobRestClient, ShareRestClient};
use filestore_core::storage::{
    AzureBlobAdapter, AzureFileAdapter, FileStorageService, LocalAdapter,
};
use filestore_shared::StorageSettings;

/// Construct the adapter described by `settings` and wrap it in the facade.
pub fn build_service(settings: &StorageSettings) -> Result<FileStorageService> {
    let service = match settings {
        StorageSettings::Local { root, origin_url } => {
            FileStorageService::new(LocalAdapter::new(root.clone(), origin_url.clone())?)
        }
        StorageSettings::AzureFileShare {
            account,
            share,
            shared_access_signature,
            endpoint,
            max_range_size,
        } => {
            let client = match endpoint {
                Some(endpoint) => ShareRestClient::new(endpoint, shared_access_signature)?,
                None => ShareRestClient::for_account(account, shared_access_signature)?,
            };
            let mut adapter = AzureFileAdapter::new(client, share, shared_access_signature);
            if let Some(size) = max_range_size {
                adapter = adapter.with_chunk_size(*size);
            }
            FileStorageService::new(adapter)
        }
        StorageSettings::AzureBlob {
            account,
            shared_access_signature,
            endpoint,
        } => {
            let client = match endpoint {
                Some(endpoint) => BlobRestClient::new(endpoint, shared_access_signature)?,
                None => BlobRestClient::for_account(account, shared_access_signature)?,
            };
            FileStorageService::new(AzureBlobAdapter::new(client, shared_access_signature))
        }
    };

    Ok(service)
}
