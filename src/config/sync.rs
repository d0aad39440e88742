//! Sync coordinator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::sync::BackoffSchedule;

/// Sync configuration (endpoint, reachability probe, retry schedule)
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the remote sync endpoint
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// API key for the sync endpoint
    pub api_key: Option<String>,

    /// Window for confirming reachability after a connectivity-restored
    /// signal, in seconds
    #[serde(default = "default_probe_window")]
    pub probe_window_secs: u64,

    /// Base delay of the exponential backoff schedule, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Total upload attempts per item before dead-lettering
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Maximum items per uploaded batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl SyncConfig {
    /// Get the reachability window as Duration
    pub fn probe_window(&self) -> Duration {
        Duration::from_secs(self.probe_window_secs)
    }

    /// Build the retry schedule from the configured base and budget
    pub fn backoff_schedule(&self) -> BackoffSchedule {
        BackoffSchedule::new(Duration::from_millis(self.backoff_base_ms), self.max_attempts)
    }

    /// Validate sync configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.endpoint_url.starts_with("http://") && !self.endpoint_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidSyncUrl);
        }
        if self.probe_window_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidRetryBudget);
        }
        if self.batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            api_key: None,
            probe_window_secs: default_probe_window(),
            backoff_base_ms: default_backoff_base_ms(),
            max_attempts: default_max_attempts(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_endpoint_url() -> String {
    "https://sync.sahayak.example".to_string()
}

fn default_probe_window() -> u64 {
    5
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    3
}

fn default_batch_size() -> usize {
    10
}
