//! GetSessionStateHandler - read-only session projection.

use std::sync::Arc;

use crate::domain::context::SessionContext;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::ContextStore;

/// Query for the current state of one session.
#[derive(Debug, Clone)]
pub struct GetSessionStateQuery {
    pub session_id: SessionId,
}

/// Handler returning a read-only copy of a session.
pub struct GetSessionStateHandler {
    store: Arc<dyn ContextStore>,
}

impl GetSessionStateHandler {
    pub fn new(store: Arc<dyn ContextStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionStateQuery) -> Result<SessionContext, DomainError> {
        self.store
            .get_session_context(&query.session_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SessionNotFound,
                    format!("Session not found: {}", query.session_id),
                )
            })
    }
}
