//! Formrelay Artifact Uploader
//!
//! Implementations of the `ArtifactStore` trait from `formrelay-domain`.
//!
//! # Stores
//!
//! - `HttpArtifactStore`: write-only HTTP object store (PUT bytes under a key)
//! - `MockArtifactStore`: deterministic in-memory mock for testing
//!
//! Every upload attempt gets a fresh, collision-free remote key, so two files
//! with the same base name never overwrite each other's artifact.
//!
//! # Examples
//!
//! ```
//! use formrelay_upload::MockArtifactStore;
//! use formrelay_domain::ArtifactStore;
//!
//! # async fn example() {
//! let store = MockArtifactStore::new();
//! let artifact = store.upload("form.jpg".as_ref()).await.unwrap();
//! assert!(artifact.key.starts_with("form-"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod http;

use async_trait::async_trait;
use formrelay_domain::{ArtifactStore, UploadedArtifact};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::HttpArtifactStore;

/// Errors that can occur while uploading an artifact
#[derive(Error, Debug)]
pub enum UploadError {
    /// The local file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The store could not be reached
    #[error("Store transport error: {0}")]
    Transport(String),

    /// The store rejected the write (quota, permission, ...)
    #[error("Store rejected write (HTTP {status}): {detail}")]
    Rejected {
        /// HTTP status code returned by the store
        status: u16,
        /// Response body, if any
        detail: String,
    },
}

/// Derive a collision-free remote key for a local file
///
/// The key keeps the file's stem and extension for human readability and
/// inserts a UUIDv7 so every upload attempt gets a distinct key.
pub fn derive_remote_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    let suffix = uuid::Uuid::now_v7().simple().to_string();

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext.to_ascii_lowercase()),
        None => format!("{}-{}", stem, suffix),
    }
}

/// Content type for a local file, inferred from its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Mock artifact store for deterministic testing
///
/// Records every upload in memory and never touches the network. Can be
/// armed to fail all uploads to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MockArtifactStore {
    uploads: Arc<Mutex<Vec<UploadedArtifact>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockArtifactStore {
    /// Create a mock store that accepts every upload
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail with a transport error
    pub fn fail_uploads(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Keys handed out so far, in upload order
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.key.clone())
            .collect()
    }

    /// Number of successful uploads
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    type Error = UploadError;

    async fn upload(&self, local_path: &Path) -> Result<UploadedArtifact, Self::Error> {
        if *self.fail.lock().unwrap() {
            return Err(UploadError::Transport("mock store unavailable".to_string()));
        }

        let artifact = UploadedArtifact {
            key: derive_remote_key(local_path),
            content_type: content_type_for(local_path).to_string(),
        };
        self.uploads.lock().unwrap().push(artifact.clone());
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_remote_key_keeps_stem_and_extension() {
        let key = derive_remote_key(Path::new("/inbox/form.JPG"));
        assert!(key.starts_with("form-"));
        assert!(key.ends_with(".jpg"));
        assert_ne!(key, "form.jpg");
    }

    #[test]
    fn test_derive_remote_key_distinct_for_same_name() {
        let a = derive_remote_key(Path::new("form.jpg"));
        let b = derive_remote_key(Path::new("form.jpg"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_remote_key_without_extension() {
        let key = derive_remote_key(Path::new("scan"));
        assert!(key.starts_with("scan-"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("a")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_mock_store_records_uploads() {
        let store = MockArtifactStore::new();

        let first = store.upload(Path::new("form.jpg")).await.unwrap();
        let second = store.upload(Path::new("form.jpg")).await.unwrap();

        assert_ne!(first.key, second.key);
        assert_eq!(store.upload_count(), 2);
        assert_eq!(store.uploaded_keys(), vec![first.key, second.key]);
    }

    #[tokio::test]
    async fn test_mock_store_failure() {
        let store = MockArtifactStore::new();
        store.fail_uploads(true);

        let result = store.upload(Path::new("form.jpg")).await;
        assert!(matches!(result, Err(UploadError::Transport(_))));
        assert_eq!(store.upload_count(), 0);
    }
}
