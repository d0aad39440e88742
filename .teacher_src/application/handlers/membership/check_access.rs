//! CheckAccessHandler - Query handler for checking user access.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::membership::MembershipError;
use crate::ports::MembershipReader;

/// Query to check if a user has access.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
}

/// Result of access check.
#[derive(Debug, Clone)]
pub struct CheckAccessResult {
    /// Whether the user has access.
    pub has_access: bool,
}

/// Handler for checking user access.
///
/// This is the most frequently called query and should be highly optimized.
/// The reader implementation may use caching for performance.
pub struct CheckAccessHandler {
    reader: Arc<dyn MembershipReader>,
}

impl CheckAccessHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: CheckAccessQuery,
    ) -> Result<CheckAccessResult, MembershipError> {
        let has_access = self
            .reader
            .check_access(&query.user_id)
            .await
            .map_err(|e| MembershipError::infrastructure(e.to_string()))?;

        Ok(CheckAccessResult { has_access })
    }
}
