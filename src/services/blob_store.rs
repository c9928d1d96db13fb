// src/services/blob_store.rs
// DOCUMENTATION: Blob storage for cached photo bytes
// PURPOSE: Upload photos under stable paths and delete superseded ones (Vercel Blob REST)

use crate::errors::BeachError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const BLOB_API_VERSION: &str = "7";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Object store holding the cached photo bytes
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, overwriting any object already there, and return its public URL
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, BeachError>;

    /// Remove the object behind `url`; an object that is already gone counts as deleted
    async fn delete(&self, url: &str) -> Result<(), BeachError>;
}

#[derive(Debug, Deserialize)]
struct PutBlobResponse {
    url: String,
}

/// Vercel Blob client
/// DOCUMENTATION: Uploads are public, without random suffixes and with overwrite allowed,
/// so the same path always maps to the same object.
pub struct VercelBlobClient {
    client: Client,
    token: String,
    api_url: String,
}

impl VercelBlobClient {
    pub fn new(token: String, api_url: String) -> Result<Self, BeachError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BeachError::Configuration(format!("Failed to build blob client: {}", e)))?;

        Ok(Self {
            client,
            token,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl BlobStore for VercelBlobClient {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BeachError> {
        let url = format!("{}/", self.api_url);

        log::debug!("Uploading blob {} ({} bytes)", path, bytes.len());

        let response = self
            .client
            .put(&url)
            .query(&[("pathname", path)])
            .header("authorization", self.bearer())
            .header("x-api-version", BLOB_API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "0")
            .header("x-allow-overwrite", "1")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                log::error!("Blob upload request failed for {}: {}", path, e);
                BeachError::BlobError(format!("Upload request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("Blob upload for {} failed with {}: {}", path, status, body);
            return Err(BeachError::BlobError(format!(
                "Upload of {} failed with {}",
                path, status
            )));
        }

        let blob: PutBlobResponse = response
            .json()
            .await
            .map_err(|e| {
                BeachError::BlobError(format!("Parse error: {}", e.without_url()))
            })?;

        Ok(blob.url)
    }

    async fn delete(&self, url: &str) -> Result<(), BeachError> {
        let endpoint = format!("{}/delete", self.api_url);

        let response = self
            .client
            .post(&endpoint)
            .header("authorization", self.bearer())
            .header("x-api-version", BLOB_API_VERSION)
            .json(&serde_json::json!({ "urls": [url] }))
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                log::error!("Blob delete request failed for {}: {}", url, e);
                BeachError::BlobError(format!("Delete request failed: {}", e))
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                log::debug!("Blob already gone: {}", url);
                Ok(())
            }
            status => {
                log::warn!("Blob delete for {} failed with {}", url, status);
                Err(BeachError::BlobError(format!(
                    "Delete of {} failed with {}",
                    url, status
                )))
            }
        }
    }
}
