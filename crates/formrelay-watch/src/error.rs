//! Error types for the detector

use thiserror::Error;

/// Errors that can occur during a directory scan
///
/// All of these are transient from the watcher's point of view: a failed
/// scan leaves the detector's state untouched and the next poll retries.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The watched directory (or a subdirectory) could not be listed
    #[error("Directory listing failed: {0}")]
    Io(#[from] std::io::Error),
}
