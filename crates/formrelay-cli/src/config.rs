//! Configuration management for the CLI.
//!
//! One TOML file, loaded once at process start and never hot-reloaded.

use crate::error::{CliError, Result};
use formrelay_watch::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Full process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Watched directory and polling settings
    pub watcher: DetectorConfig,

    /// Object store connection
    pub store: StoreSection,

    /// Extraction model connection
    pub model: ModelSection,

    /// Results table location
    pub table: TableSection,
}

/// Object store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// Store base URL
    pub endpoint: String,

    /// Destination bucket for uploaded artifacts
    pub bucket: String,

    /// Request timeout in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

/// Extraction model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    /// Extraction service base URL
    pub endpoint: String,

    /// Trained model name
    pub model_name: String,

    /// Pinned model version
    pub model_version: u32,

    /// Prediction timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

/// Results table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSection {
    /// SQLite database path
    pub db_path: PathBuf,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".formrelay").join("config.toml"))
    }

    /// Load configuration from an explicit path or the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration to a file; refuses to overwrite.
    pub fn save(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(CliError::Config(format!(
                "{} already exists, refusing to overwrite",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.watcher.validate().map_err(CliError::Config)?;

        if self.store.endpoint.is_empty() || self.store.bucket.is_empty() {
            return Err(CliError::Config(
                "store.endpoint and store.bucket must not be empty".into(),
            ));
        }
        if self.model.endpoint.is_empty() || self.model.model_name.is_empty() {
            return Err(CliError::Config(
                "model.endpoint and model.model_name must not be empty".into(),
            ));
        }
        if self.store.timeout_secs == 0 || self.model.timeout_secs == 0 {
            return Err(CliError::Config("timeouts must be greater than 0".into()));
        }
        if self.table.db_path.as_os_str().is_empty() {
            return Err(CliError::Config("table.db_path must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watcher: DetectorConfig::default(),
            store: StoreSection {
                endpoint: "http://localhost:9000".to_string(),
                bucket: "form-uploads".to_string(),
                timeout_secs: default_store_timeout(),
            },
            model: ModelSection {
                endpoint: "http://localhost:8088".to_string(),
                model_name: "form_reader".to_string(),
                model_version: 1,
                timeout_secs: default_model_timeout(),
            },
            table: TableSection {
                db_path: PathBuf::from("formrelay.db"),
            },
        }
    }
}

fn default_store_timeout() -> u64 {
    30
}

fn default_model_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.store.bucket, config.store.bucket);
        assert_eq!(loaded.model.model_version, config.model.model_version);
        assert_eq!(loaded.watcher.poll_interval_secs, config.watcher.poll_interval_secs);
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        Config::default().save(&path).unwrap();
        assert!(matches!(
            Config::default().save(&path),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_timeout_defaults_applied() {
        let toml_str = r#"
            [watcher]
            watch_dir = "/data/inbox"
            allowed_extensions = ["jpg"]
            poll_interval_secs = 1

            [store]
            endpoint = "http://localhost:9000"
            bucket = "form-uploads"

            [model]
            endpoint = "http://localhost:8088"
            model_name = "form_reader"
            model_version = 2

            [table]
            db_path = "formrelay.db"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.timeout_secs, 30);
        assert_eq!(config.model.timeout_secs, 60);
        assert_eq!(config.model.model_version, 2);
    }

    #[test]
    fn test_invalid_watcher_section_rejected() {
        let mut config = Config::default();
        config.watcher.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
