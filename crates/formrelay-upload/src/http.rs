//! HTTP object store implementation
//!
//! Writes artifacts to any store exposing a plain
//! `PUT {endpoint}/{bucket}/{key}` surface (S3-compatible gateways, MinIO,
//! nginx with dav_methods, ...). The interface is write-only: this system
//! never reads or deletes an artifact once stored.

use crate::{content_type_for, derive_remote_key, UploadError};
use async_trait::async_trait;
use formrelay_domain::{ArtifactStore, UploadedArtifact};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for store requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Write-only HTTP object store client
pub struct HttpArtifactStore {
    endpoint: String,
    bucket: String,
    client: reqwest::Client,
}

impl HttpArtifactStore {
    /// Create a new store client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: store base URL (e.g., "http://localhost:9000")
    /// - `bucket`: destination bucket/container name
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, bucket, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new store client with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            client,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    type Error = UploadError;

    /// Upload a local file under a fresh, collision-free key
    ///
    /// # Errors
    ///
    /// - `UploadError::Read` if the local file cannot be read
    /// - `UploadError::Transport` if the store is unreachable
    /// - `UploadError::Rejected` if the store refuses the write
    ///
    /// No retry is performed here; the whole pipeline step is cheap to retry
    /// from the top.
    async fn upload(&self, local_path: &Path) -> Result<UploadedArtifact, Self::Error> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|source| UploadError::Read {
                path: local_path.to_path_buf(),
                source,
            })?;

        let key = derive_remote_key(local_path);
        let content_type = content_type_for(local_path);
        let url = self.object_url(&key);

        debug!(url = %url, bytes = bytes.len(), "uploading artifact");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        info!(
            path = %local_path.display(),
            key = %key,
            "artifact uploaded"
        );

        Ok(UploadedArtifact {
            key,
            content_type: content_type.to_string(),
        })
    }
}
