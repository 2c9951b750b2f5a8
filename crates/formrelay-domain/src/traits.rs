//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! infrastructure. Implementations live in other crates.

use crate::extraction::ExtractionResult;
use crate::record::{FormRecord, RecordId};
use async_trait::async_trait;
use std::path::Path;

/// A remote object reference returned by an upload
///
/// Immutable once created; never deleted by this system (retention is the
/// store's concern).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    /// Remote key, unique per upload attempt
    pub key: String,

    /// Content type the artifact was stored with
    pub content_type: String,
}

/// Write-only durable object storage
///
/// Implemented by the infrastructure layer (formrelay-upload)
#[async_trait]
pub trait ArtifactStore {
    /// Error type for store operations
    type Error;

    /// Upload a stable local file under a collision-free remote key
    async fn upload(&self, local_path: &Path) -> Result<UploadedArtifact, Self::Error>;
}

/// A named, versioned document-extraction model
///
/// Implemented by the infrastructure layer (formrelay-extract)
#[async_trait]
pub trait ExtractionModel {
    /// Error type for extraction operations
    type Error;

    /// Run the model against an uploaded artifact
    ///
    /// Side-effect-free on the model: re-invoking with the same key is safe.
    async fn predict(&self, artifact_key: &str) -> Result<ExtractionResult, Self::Error>;
}

/// The persisted results table
///
/// Implemented by the infrastructure layer (formrelay-record)
pub trait RecordStore {
    /// Error type for persistence operations
    type Error;

    /// Insert one normalized record as exactly one new row
    ///
    /// `source_key` is the remote key of the artifact the record was
    /// extracted from, kept for provenance.
    fn insert_record(
        &mut self,
        record: &FormRecord,
        source_key: &str,
    ) -> Result<RecordId, Self::Error>;
}
