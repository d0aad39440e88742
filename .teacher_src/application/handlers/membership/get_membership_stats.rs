//! GetMembershipStatsHandler - Query handler for admin statistics.

use std::sync::Arc;

use crate::domain::membership::MembershipError;
use crate::ports::{MembershipReader, MembershipStatistics};

/// Query to get membership statistics.
///
/// This is an admin-only query for dashboard displays.
#[derive(Debug, Clone)]
pub struct GetMembershipStatsQuery;

/// Result type for statistics query.
pub type GetMembershipStatsResult = MembershipStatistics;

/// Handler for retrieving membership statistics.
///
/// Returns aggregate statistics about all memberships for admin dashboard.
pub struct GetMembershipStatsHandler {
    reader: Arc<dyn MembershipReader>,
}

impl GetMembershipStatsHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        _query: GetMembershipStatsQuery,
    ) -> Result<GetMembershipStatsResult, MembershipError> {
        self.reader
            .get_statistics()
            .await
            .map_err(|e| MembershipError::infrastructure(e.to_string()))
    }
}
