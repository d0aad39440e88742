//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format (expected sqlite: or 'memory')")]
    InvalidDatabaseUrl,

    #[error("Queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("Invalid advisor base URL (expected http:// or https://)")]
    InvalidAdvisorUrl,

    #[error("Invalid sync endpoint URL (expected http:// or https://)")]
    InvalidSyncUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Sync retry budget must be at least 1 attempt")]
    InvalidRetryBudget,

    #[error("Sync batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Decline budget must be at least 1")]
    InvalidDeclineBudget,

    #[error("Confidence floor must be within [0, 1]")]
    InvalidConfidenceFloor,

    #[error("Session timeout must be at least 1 minute")]
    InvalidSessionTimeout,
}
