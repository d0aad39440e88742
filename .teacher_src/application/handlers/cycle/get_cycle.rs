//! GetCycleHandler - Query handler for retrieving cycle details.
//!
//! Returns a detailed view of a cycle for UI display,
//! including component statuses and progress information.

use std::sync::Arc;

use crate::domain::foundation::{CycleId, DomainError, ErrorCode};
use crate::ports::{CycleReader, CycleView};

/// Query to get a cycle by ID.
#[derive(Debug, Clone)]
pub struct GetCycleQuery {
    /// The cycle to retrieve.
    pub cycle_id: CycleId,
}

/// Result of successful cycle query.
pub type GetCycleResult = CycleView;

/// Error type for getting a cycle.
#[derive(Debug, Clone)]
pub enum GetCycleError {
    /// Cycle not found.
    NotFound(CycleId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for GetCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetCycleError::NotFound(id) => write!(f, "Cycle not found: {}", id),
            GetCycleError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for GetCycleError {}

impl From<DomainError> for GetCycleError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::CycleNotFound => GetCycleError::NotFound(CycleId::new()),
            _ => GetCycleError::Infrastructure(err.message),
        }
    }
}

/// Handler for retrieving cycle details.
///
/// Returns the full cycle view for UI display,
/// or an error if the cycle doesn't exist.
pub struct GetCycleHandler {
    reader: Arc<dyn CycleReader>,
}

impl GetCycleHandler {
    pub fn new(reader: Arc<dyn CycleReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetCycleQuery) -> Result<GetCycleResult, GetCycleError> {
        self.reader
            .get_by_id(&query.cycle_id)
            .await?
            .ok_or(GetCycleError::NotFound(query.cycle_id))
    }
}
