//! Formrelay Extraction Client
//!
//! Implementations of the `ExtractionModel` trait from `formrelay-domain`.
//!
//! # Models
//!
//! - `HttpExtractionModel`: invokes a named, versioned extraction model over
//!   HTTP and deserializes its structured response
//! - `MockModel`: canned responses for testing
//!
//! This layer performs transport and deserialization only; the confidence
//! score and per-field predictions are opaque to it. Interpretation belongs
//! to the normalizer in `formrelay-domain`.

#![warn(missing_docs)]

pub mod http;
mod parser;

use async_trait::async_trait;
use formrelay_domain::{ExtractionModel, ExtractionResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::HttpExtractionModel;
pub use parser::parse_predict_response;

/// Errors that can occur while invoking the extraction model
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The model did not respond within the configured timeout
    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Transport(String),

    /// The model returned an error status
    #[error("Model error (HTTP {status}): {detail}")]
    ModelError {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, if any
        detail: String,
    },

    /// The named model or version is not known to the service
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The response body could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Mock extraction model for deterministic testing
///
/// Returns pre-configured results without any network calls.
///
/// # Examples
///
/// ```
/// use formrelay_extract::MockModel;
/// use formrelay_domain::{ExtractionModel, ExtractionResult};
///
/// # async fn example() {
/// let mut result = ExtractionResult::default();
/// result.set_field("date", "2024-01-05");
///
/// let model = MockModel::new(result);
/// let prediction = model.predict("form-abc.jpg").await.unwrap();
/// assert_eq!(prediction.first_value("date"), Some("2024-01-05"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockModel {
    default_result: ExtractionResult,
    results: Arc<Mutex<HashMap<String, ExtractionResult>>>,
    fail_timeout: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockModel {
    /// Create a mock returning a fixed result for every artifact key
    pub fn new(result: ExtractionResult) -> Self {
        Self {
            default_result: result,
            results: Arc::new(Mutex::new(HashMap::new())),
            fail_timeout: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific result for a given artifact key
    pub fn add_result(&mut self, key: impl Into<String>, result: ExtractionResult) {
        self.results.lock().unwrap().insert(key.into(), result);
    }

    /// Make every subsequent call fail with a timeout
    pub fn fail_with_timeout(&self, fail: bool) {
        *self.fail_timeout.lock().unwrap() = fail;
    }

    /// Get the number of times predict was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new(ExtractionResult::default())
    }
}

#[async_trait]
impl ExtractionModel for MockModel {
    type Error = ExtractionError;

    async fn predict(&self, artifact_key: &str) -> Result<ExtractionResult, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if *self.fail_timeout.lock().unwrap() {
            return Err(ExtractionError::Timeout(0));
        }

        let results = self.results.lock().unwrap();
        Ok(results
            .get(artifact_key)
            .cloned()
            .unwrap_or_else(|| self.default_result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_model_default_result() {
        let mut result = ExtractionResult {
            score: Some(0.9),
            ..Default::default()
        };
        result.set_field("dropdown", "Option B");

        let model = MockModel::new(result.clone());
        assert_eq!(model.predict("anything.jpg").await.unwrap(), result);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_model_keyed_result() {
        let mut model = MockModel::default();
        let mut keyed = ExtractionResult::default();
        keyed.set_field("numeric", "42");
        model.add_result("form-1.jpg", keyed);

        let hit = model.predict("form-1.jpg").await.unwrap();
        assert_eq!(hit.first_value("numeric"), Some("42"));

        let miss = model.predict("form-2.jpg").await.unwrap();
        assert_eq!(miss, ExtractionResult::default());
    }

    #[tokio::test]
    async fn test_mock_model_timeout() {
        let model = MockModel::default();
        model.fail_with_timeout(true);

        let result = model.predict("form.jpg").await;
        assert!(matches!(result, Err(ExtractionError::Timeout(_))));
    }
}
