//! Error types for PrOACT components.

use thiserror::Error;

use crate::domain::foundation::ComponentStatus;

/// Errors that can occur during component operations.
#[derive(Debug, Clone, Error)]
pub enum ComponentError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: ComponentStatus,
        to: ComponentStatus,
    },

    #[error("Invalid output data: {0}")]
    InvalidOutput(String),

    #[error("Component not started")]
    NotStarted,

    #[error("Component already complete")]
    AlreadyComplete,
}
