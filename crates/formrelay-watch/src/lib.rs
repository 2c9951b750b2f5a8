//! Formrelay Stable-File Detector
//!
//! Watches a local directory by polling and emits a dispatch event for a file
//! only once its size has stopped changing. This guards against picking up
//! partially-written files from slow network-drive syncs.
//!
//! # Stability Rule
//!
//! A file is **stable** when its size is identical across at least two
//! consecutive observations and non-zero. Each stabilized file is dispatched
//! exactly once; the detector remembers dispatched paths in a seen-set it
//! owns exclusively.
//!
//! # Example
//!
//! ```no_run
//! use formrelay_watch::{DetectorConfig, StableFileDetector};
//!
//! let config = DetectorConfig {
//!     watch_dir: "/data/inbox".into(),
//!     ..Default::default()
//! };
//! let mut detector = StableFileDetector::new(config);
//!
//! // One observation pass; call again after the polling interval.
//! let ready = detector.scan().unwrap();
//! for path in ready {
//!     println!("stable: {}", path.display());
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod detector;
mod error;

pub use config::DetectorConfig;
pub use detector::StableFileDetector;
pub use error::DetectError;
