//! Sync watermark for idempotent, resumable downloads.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Persisted marker of the last server update applied for a user.
///
/// The token is opaque to this core: the sync endpoint hands it back with
/// every download and the coordinator persists it only after the updates
/// have been applied, so re-running a sync cycle re-applies nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCursor {
    user_id: UserId,
    token: String,
    updated_at: Timestamp,
}

impl SyncCursor {
    /// Creates a cursor positioned at the given server token.
    pub fn new(user_id: UserId, token: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
            updated_at: Timestamp::now(),
        }
    }

    /// Returns the user this cursor belongs to.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the opaque server token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns when the cursor was last advanced.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_carries_token_and_user() {
        let cursor = SyncCursor::new(UserId::new("vendor-1").unwrap(), "tok-42");
        assert_eq!(cursor.token(), "tok-42");
        assert_eq!(cursor.user_id().as_str(), "vendor-1");
    }

    #[test]
    fn cursor_round_trips_through_json() {
        let cursor = SyncCursor::new(UserId::new("vendor-1").unwrap(), "tok-42");
        let json = serde_json::to_string(&cursor).unwrap();
        let back: SyncCursor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cursor);
    }
}
