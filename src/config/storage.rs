//! On-device storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Special database URL selecting the in-memory adapters.
pub const MEMORY_URL: &str = "memory";

/// Storage configuration (SQLite database and offline queue bounds)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Database URL. `sqlite:<path>` opens an on-device file,
    /// `"memory"` selects the in-memory adapters (dev/tests).
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum number of live (pending or in-flight) queued items
    /// before the eviction policy runs.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl StorageConfig {
    /// True if the in-memory adapters were selected.
    pub fn is_in_memory(&self) -> bool {
        self.database_url == MEMORY_URL
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_in_memory() && !self.database_url.starts_with("sqlite:") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:sahayak.db?mode=rwc".to_string()
}

fn default_queue_capacity() -> usize {
    500
}
