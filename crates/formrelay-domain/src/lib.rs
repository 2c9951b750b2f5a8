//! Formrelay Domain Layer
//!
//! Core types and trait seams for the form-capture pipeline. This crate
//! defines the entities that flow through the pipeline and the interfaces
//! the infrastructure crates implement; it contains no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **ExtractionResult**: the raw, untrusted output of the extraction model
//! - **FormRecord**: the fixed-schema, normalized row committed to the table
//! - **normalize**: the total function mapping one to the other
//! - **Trait seams**: `ArtifactStore`, `ExtractionModel` and `RecordStore`,
//!   implemented by `formrelay-upload`, `formrelay-extract` and
//!   `formrelay-record`, consumed generically by `formrelay-pipeline`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extraction;
pub mod normalize;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use extraction::{ExtractionResult, FieldPrediction};
pub use normalize::normalize;
pub use record::{FormRecord, RecordId};
pub use traits::{ArtifactStore, ExtractionModel, RecordStore, UploadedArtifact};
