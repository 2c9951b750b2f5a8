//! Error types for the pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort one file's pipeline run
///
/// Stage errors are carried as strings: the orchestrator only ever logs them
/// alongside the file path and stage name, it never branches on their
/// contents.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The file's extension is not in the allow-list
    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// The artifact upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The extraction call failed
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The row insert failed; the extraction result is lost
    #[error("Persist failed: {0}")]
    Persist(String),
}

impl PipelineError {
    /// Name of the stage that failed, for log correlation
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::UnsupportedFile(_) => "filter",
            PipelineError::Upload(_) => "upload",
            PipelineError::Extraction(_) => "extraction",
            PipelineError::Persist(_) => "persist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(
            PipelineError::UnsupportedFile("a.txt".into()).stage(),
            "filter"
        );
        assert_eq!(PipelineError::Upload("x".into()).stage(), "upload");
        assert_eq!(PipelineError::Extraction("x".into()).stage(), "extraction");
        assert_eq!(PipelineError::Persist("x".into()).stage(), "persist");
    }
}
