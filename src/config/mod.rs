//! Configuration loading and management

use crate::core::UploadError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default acquisition size limit (5 MB)
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Size limit used by the bulk upload page (10 MB)
pub const PAGE_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Highest value simulated progress may reach before the read completes
pub const MAX_PROGRESS_CAP: u8 = 99;

/// Limits and progress settings for file acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Largest accepted file, in bytes
    pub max_size_bytes: u64,

    /// Accepted file name extensions, including the dot (e.g. ".csv")
    pub allowed_extensions: Vec<String>,

    /// Progress increment per tick while a read is in flight
    pub progress_step: u8,

    /// Ceiling for simulated progress until the read completes
    pub progress_cap: u8,

    /// Milliseconds between progress ticks
    pub progress_interval_ms: u64,
}

impl AcquisitionConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    /// `progress_cap`, held below 100
    pub fn effective_progress_cap(&self) -> u8 {
        self.progress_cap.min(MAX_PROGRESS_CAP)
    }

    /// `progress_step`, at least 1
    pub fn effective_progress_step(&self) -> u8 {
        self.progress_step.max(1)
    }

    /// Whether `file_name` ends with one of the allowed extensions
    pub fn accepts_extension(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            allowed_extensions: vec![".csv".to_string()],
            progress_step: 10,
            progress_cap: 90,
            progress_interval_ms: 200,
        }
    }
}

/// Settings for the parse and validate pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject batches with more data rows than this (unlimited when absent)
    pub max_rows: Option<usize>,
}

/// Complete configuration for the upload pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub acquisition: AcquisitionConfig,
    pub validation: ValidationConfig,
}

impl UploadConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, UploadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| UploadError::Config(format!("cannot read {}: {}", path, e)))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, UploadError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Defaults used by the bulk upload page: same as `default()` with a 10 MB limit
    pub fn page_defaults() -> Self {
        Self {
            acquisition: AcquisitionConfig {
                max_size_bytes: PAGE_MAX_SIZE_BYTES,
                ..AcquisitionConfig::default()
            },
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), UploadError> {
        let acquisition = &self.acquisition;
        if acquisition.allowed_extensions.is_empty() {
            return Err(UploadError::Config(
                "allowed_extensions must not be empty".to_string(),
            ));
        }
        if acquisition.progress_cap > MAX_PROGRESS_CAP {
            return Err(UploadError::Config(
                "progress_cap must stay below 100".to_string(),
            ));
        }
        if acquisition.progress_step == 0 {
            return Err(UploadError::Config(
                "progress_step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
