//! ListUserSessionsHandler - Query handler for listing user's sessions.

use std::sync::Arc;

use crate::domain::foundation::{SessionStatus, UserId};
use crate::domain::session::SessionError;
use crate::ports::{ListOptions, SessionList, SessionReader};

/// Query to list sessions for a user.
#[derive(Debug, Clone)]
pub struct ListUserSessionsQuery {
    pub user_id: UserId,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<SessionStatus>,
    pub include_archived: bool,
}

impl ListUserSessionsQuery {
    /// Create a simple query for all active sessions.
    pub fn all_active(user_id: UserId) -> Self {
        Self {
            user_id,
            page: None,
            per_page: None,
            status: None,
            include_archived: false,
        }
    }

    /// Create a paginated query.
    pub fn paginated(user_id: UserId, page: u32, per_page: u32) -> Self {
        Self {
            user_id,
            page: Some(page),
            per_page: Some(per_page),
            status: None,
            include_archived: false,
        }
    }

    /// Build ListOptions from the query.
    fn to_list_options(&self) -> ListOptions {
        let mut options = match (self.page, self.per_page) {
            (Some(page), Some(per_page)) => ListOptions::paginated(page, per_page),
            _ => ListOptions::default(),
        };

        if let Some(status) = self.status {
            options = options.with_status(status);
        }

        if self.include_archived {
            options = options.with_archived();
        }

        options
    }
}

/// Handler for listing user sessions.
pub struct ListUserSessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl ListUserSessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListUserSessionsQuery) -> Result<SessionList, SessionError> {
        let options = query.to_list_options();
        let list = self.reader.list_by_user(&query.user_id, &options).await?;
        Ok(list)
    }
}
