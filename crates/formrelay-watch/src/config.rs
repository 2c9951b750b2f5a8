//! Configuration for the detector

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Stable-File Detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Directory to watch for new form images
    pub watch_dir: PathBuf,

    /// Accepted file extensions, lowercase, without the leading dot
    pub allowed_extensions: Vec<String>,

    /// Seconds between directory scans
    pub poll_interval_secs: u64,
}

impl DetectorConfig {
    /// Get the polling interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Check whether a path carries an allowed extension (case-insensitive)
    pub fn is_allowed(&self, path: &std::path::Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|a| *a == ext)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.watch_dir.as_os_str().is_empty() {
            return Err("watch_dir must not be empty".to_string());
        }
        if self.allowed_extensions.is_empty() {
            return Err("allowed_extensions must not be empty".to_string());
        }
        if self
            .allowed_extensions
            .iter()
            .any(|e| e.starts_with('.') || e.chars().any(|c| c.is_ascii_uppercase()))
        {
            return Err(
                "allowed_extensions must be lowercase without a leading dot".to_string()
            );
        }
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for DetectorConfig {
    /// Defaults to the image types a phone camera produces, scanned every second
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("."),
            allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            poll_interval_secs: 1,
        }
    }
}
