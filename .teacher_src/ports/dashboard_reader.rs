use async_trait::async_trait;
use crate::domain::dashboard::{ComponentDetailView, CycleComparison, DashboardOverview};
use crate::domain::foundation::{ComponentType, CycleId, SessionId, UserId};

/// Read-only port for dashboard queries
#[async_trait]
pub trait DashboardReader: Send + Sync {
    /// Gets the main dashboard overview for a session
    /// If cycle_id is None, uses the most recently updated active cycle
    async fn get_overview(
        &self,
        session_id: SessionId,
        cycle_id: Option<CycleId>,
        user_id: &UserId,
    ) -> Result<DashboardOverview, DashboardError>;

    /// Gets detailed view for a specific component
    async fn get_component_detail(
        &self,
        cycle_id: CycleId,
        component_type: ComponentType,
        user_id: &UserId,
    ) -> Result<ComponentDetailView, DashboardError>;

    /// Compares multiple cycles
    async fn compare_cycles(
        &self,
        cycle_ids: &[CycleId],
        user_id: &UserId,
    ) -> Result<CycleComparison, DashboardError>;
}

/// Errors that can occur during dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Cycle not found: {0}")]
    CycleNotFound(CycleId),

    #[error("Component not found: {0:?}")]
    ComponentNotFound(ComponentType),

    #[error("Unauthorized access to session")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for DashboardError {
    fn from(err: sqlx::Error) -> Self {
        DashboardError::Database(err.to_string())
    }
}
