//! GetCycleTreeHandler - Query handler for retrieving the cycle tree.
//!
//! Returns the hierarchical tree of cycles for a session,
//! showing the root cycle and all its branches.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{CycleReader, CycleTreeNode};

/// Query to get the cycle tree for a session.
#[derive(Debug, Clone)]
pub struct GetCycleTreeQuery {
    /// The session to get the tree for.
    pub session_id: SessionId,
}

/// Result of successful cycle tree query.
pub type GetCycleTreeResult = CycleTreeNode;

/// Error type for getting a cycle tree.
#[derive(Debug, Clone)]
pub enum GetCycleTreeError {
    /// No cycles found for session.
    NoCycles(SessionId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for GetCycleTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetCycleTreeError::NoCycles(id) => write!(f, "No cycles found for session: {}", id),
            GetCycleTreeError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for GetCycleTreeError {}

impl From<DomainError> for GetCycleTreeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => GetCycleTreeError::NoCycles(SessionId::new()),
            _ => GetCycleTreeError::Infrastructure(err.message),
        }
    }
}

/// Handler for retrieving the cycle tree.
///
/// Returns the full cycle hierarchy for visualization,
/// or an error if no cycles exist for the session.
pub struct GetCycleTreeHandler {
    reader: Arc<dyn CycleReader>,
}

impl GetCycleTreeHandler {
    pub fn new(reader: Arc<dyn CycleReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetCycleTreeQuery,
    ) -> Result<GetCycleTreeResult, GetCycleTreeError> {
        self.reader
            .get_tree(&query.session_id)
            .await?
            .ok_or(GetCycleTreeError::NoCycles(query.session_id))
    }
}
