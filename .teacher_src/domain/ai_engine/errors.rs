//! Error types for AI Engine domain

use crate::domain::foundation::ComponentType;

/// Orchestrator domain errors
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum OrchestratorError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: ComponentType,
        to: ComponentType,
    },

    #[error("Step {0:?} not yet completed")]
    StepNotCompleted(ComponentType),

    #[error("Cycle already completed")]
    CycleCompleted,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Step not found: {0:?}")]
    StepNotFound(ComponentType),
}

/// Compression errors
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum CompressionError {
    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Context too large: {size} exceeds limit {limit}")]
    ContextTooLarge { size: usize, limit: usize },
}

/// Extraction errors
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ExtractionError {
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported component: {0:?}")]
    UnsupportedComponent(ComponentType),
}
