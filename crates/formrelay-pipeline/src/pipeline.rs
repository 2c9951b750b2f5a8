//! Per-file sequential pipeline

use crate::error::PipelineError;
use formrelay_domain::{normalize, ArtifactStore, ExtractionModel, RecordId, RecordStore};
use std::path::Path;
use tracing::{debug, info};

/// Sequences upload → extraction → normalization → commit for one file
///
/// Generic over the three infrastructure seams so tests can substitute
/// mocks. The pipeline holds no cross-file state; the only state in the
/// system lives in the detector's seen-set and the results table.
pub struct Pipeline<A, M, R>
where
    A: ArtifactStore,
    M: ExtractionModel,
    R: RecordStore,
{
    artifacts: A,
    model: M,
    records: R,
    allowed_extensions: Vec<String>,
}

impl<A, M, R> Pipeline<A, M, R>
where
    A: ArtifactStore,
    M: ExtractionModel,
    R: RecordStore,
    A::Error: std::fmt::Display,
    M::Error: std::fmt::Display,
    R::Error: std::fmt::Display,
{
    /// Create a new pipeline over concrete stage implementations
    ///
    /// `allowed_extensions` duplicates the detector's filter on purpose
    /// (belt-and-suspenders): the pipeline refuses disallowed files even if
    /// handed one directly.
    pub fn new(artifacts: A, model: M, records: R, allowed_extensions: Vec<String>) -> Self {
        Self {
            artifacts,
            model,
            records,
            allowed_extensions,
        }
    }

    /// Run one file end to end and commit its record
    ///
    /// At-most-once per invocation: no stage retries internally. On failure
    /// the error names the stage; an artifact uploaded before a later stage
    /// failed is left in the store as an orphan (retention is the store's
    /// concern).
    pub async fn process_file(&mut self, path: &Path) -> Result<RecordId, PipelineError> {
        if !self.is_allowed(path) {
            return Err(PipelineError::UnsupportedFile(path.to_path_buf()));
        }

        debug!(path = %path.display(), "pipeline start");

        let artifact = self
            .artifacts
            .upload(path)
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        let result = self
            .model
            .predict(&artifact.key)
            .await
            .map_err(|e| PipelineError::Extraction(e.to_string()))?;

        let record = normalize(&result);

        let record_id = self
            .records
            .insert_record(&record, &artifact.key)
            .map_err(|e| PipelineError::Persist(e.to_string()))?;

        info!(
            path = %path.display(),
            artifact = %artifact.key,
            record_id = %record_id,
            score = record.score,
            "pipeline complete"
        );

        Ok(record_id)
    }

    fn is_allowed(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|a| *a == ext)
    }

    /// The record store, for post-run inspection
    pub fn records(&self) -> &R {
        &self.records
    }
}
