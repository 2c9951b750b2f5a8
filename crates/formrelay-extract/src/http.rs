//! HTTP extraction service client
//!
//! Invokes a named, versioned extraction model over HTTP. One request per
//! artifact, at-most-once: no retry is built in here, because the artifact
//! and the invocation are side-effect-free on the model and the caller can
//! simply re-invoke with the same key.

use crate::parser::parse_predict_response;
use crate::ExtractionError;
use async_trait::async_trait;
use formrelay_domain::{ExtractionModel, ExtractionResult};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for a prediction call (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the extraction service
pub struct HttpExtractionModel {
    endpoint: String,
    model_name: String,
    model_version: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

/// Request body for the predict endpoint
#[derive(Serialize)]
struct PredictRequest<'a> {
    model: &'a str,
    version: u32,
    artifact: &'a str,
}

impl HttpExtractionModel {
    /// Create a new extraction client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: service base URL (e.g., "http://localhost:8088")
    /// - `model_name`: trained model to invoke (e.g., "form_reader")
    /// - `model_version`: model version to pin
    pub fn new(
        endpoint: impl Into<String>,
        model_name: impl Into<String>,
        model_version: u32,
    ) -> Self {
        let client = reqwest::Client::new();

        Self {
            endpoint: endpoint.into(),
            model_name: model_name.into(),
            model_version,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client,
        }
    }

    /// Set the prediction timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    async fn request(&self, artifact_key: &str) -> Result<ExtractionResult, ExtractionError> {
        let url = format!("{}/v1/predict", self.endpoint.trim_end_matches('/'));
        let body = PredictRequest {
            model: &self.model_name,
            version: self.model_version,
            artifact: artifact_key,
        };

        debug!(
            model = %self.model_name,
            version = self.model_version,
            artifact = %artifact_key,
            "requesting prediction"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ExtractionError::ModelNotAvailable(format!(
                "{} v{}",
                self.model_name, self.model_version
            )));
        }
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExtractionError::ModelError {
                status: status.as_u16(),
                detail,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        parse_predict_response(&text)
    }
}

#[async_trait]
impl ExtractionModel for HttpExtractionModel {
    type Error = ExtractionError;

    /// Run the model against an uploaded artifact, blocking until the
    /// structured response arrives or the timeout elapses
    async fn predict(&self, artifact_key: &str) -> Result<ExtractionResult, Self::Error> {
        let result = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.request(artifact_key),
        )
        .await
        .map_err(|_| ExtractionError::Timeout(self.timeout_secs))??;

        info!(
            artifact = %artifact_key,
            score = ?result.score,
            fields = result.fields.len(),
            "prediction received"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let model = HttpExtractionModel::new("http://localhost:8088", "form_reader", 1);
        assert_eq!(model.endpoint, "http://localhost:8088");
        assert_eq!(model.model_name, "form_reader");
        assert_eq!(model.model_version, 1);
        assert_eq!(model.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_with_timeout_secs() {
        let model =
            HttpExtractionModel::new("http://localhost:8088", "form_reader", 2).with_timeout_secs(5);
        assert_eq!(model.timeout_secs, 5);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let model = HttpExtractionModel::new("http://127.0.0.1:9", "form_reader", 1)
            .with_timeout_secs(2);

        let result = model.predict("form-abc.jpg").await;
        assert!(matches!(result, Err(ExtractionError::Transport(_))));
    }
}
