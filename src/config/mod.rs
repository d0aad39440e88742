//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `SAHAYAK_` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use sahayak::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Database at {}", config.storage.database_url);
//! ```

mod advisor;
mod dialogue;
mod error;
mod storage;
mod sync;

pub use advisor::AdvisorConfig;
pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::{StorageConfig, MEMORY_URL};
pub use sync::SyncConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Sahayak engine. Load
/// using [`AppConfig::load()`] which reads from environment variables.
/// Every section has working defaults so the dev harness runs without
/// any environment at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Storage configuration (SQLite database, queue bounds)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Business Advisor configuration (guidance service client)
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Sync configuration (endpoint, probe window, retry schedule)
    #[serde(default)]
    pub sync: SyncConfig,

    /// Dialogue configuration (question policy, session timeout)
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SAHAYAK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SAHAYAK__STORAGE__DATABASE_URL=sqlite:sahayak.db` -> `storage.database_url`
    /// - `SAHAYAK__SYNC__ENDPOINT_URL=https://...` -> `sync.endpoint_url`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("SAHAYAK").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration: URL formats,
    /// retry budgets, confidence ranges.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.advisor.validate()?;
        self.sync.validate()?;
        self.dialogue.validate()?;
        Ok(())
    }
}
