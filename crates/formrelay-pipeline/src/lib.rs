//! Formrelay Pipeline
//!
//! Wires the detector, uploader, extraction client, normalizer and row
//! committer into a per-file sequential pipeline with error containment.
//!
//! # Architecture
//!
//! ```text
//! Detector → (filter) → ArtifactStore → ExtractionModel → normalize → RecordStore
//! ```
//!
//! One file at a time, end to end, no buffering beyond the OS directory
//! itself. An error in any stage aborts that file's pipeline, is logged with
//! the file path and stage name, and the watch loop moves on. The worker
//! never terminates because of a single bad file.
//!
//! # Example
//!
//! ```no_run
//! use formrelay_pipeline::{Pipeline, PipelineWorker};
//! use formrelay_upload::MockArtifactStore;
//! use formrelay_extract::MockModel;
//! use formrelay_record::SqliteRecordStore;
//! use formrelay_watch::DetectorConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(
//!     MockArtifactStore::new(),
//!     MockModel::default(),
//!     SqliteRecordStore::in_memory()?,
//!     vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
//! );
//!
//! let config = DetectorConfig {
//!     watch_dir: "/data/inbox".into(),
//!     ..Default::default()
//! };
//! let mut worker = PipelineWorker::new(config, pipeline);
//!
//! // Run until Ctrl+C.
//! worker.run().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod metrics;
mod pipeline;
mod worker;

pub use error::PipelineError;
pub use metrics::WorkerMetrics;
pub use pipeline::Pipeline;
pub use worker::PipelineWorker;
