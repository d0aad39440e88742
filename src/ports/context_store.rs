//! Context Store port - versioned session and user state persistence.
//!
//! # Design
//!
//! - **Keyed records**: sessions by session id, profiles by user id,
//!   cursors by user id
//! - **Atomic per-session writes**: `update_context` applies a whole
//!   patch or nothing; partial writes are never observable
//! - **Read-your-writes**: updates are visible to subsequent reads on
//!   the same session within one second of acceptance

use async_trait::async_trait;

use crate::domain::context::{ContextPatch, SessionContext, SyncCursor, UserProfile};
use crate::domain::foundation::{DomainError, SessionId, UserId};

/// Persistence port for session contexts, user profiles, and sync cursors.
///
/// Implementations must ensure:
/// - Session updates are serialized per session (no interleaved patches)
/// - Closed sessions reject further patches with `SessionClosed`
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Persist a freshly created session.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn create_session(&self, context: &SessionContext) -> Result<(), DomainError>;

    /// Fetch a session by id. Returns `None` if unknown.
    async fn get_session_context(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionContext>, DomainError>;

    /// Apply a patch to a session and return the updated context.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    /// - `SessionClosed` if the session is no longer mutable
    /// - `StorageError` on persistence failure
    async fn update_context(
        &self,
        id: &SessionId,
        patch: ContextPatch,
    ) -> Result<SessionContext, DomainError>;

    /// Close a session. Idempotent: closing a closed session returns
    /// `false` rather than an error.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    async fn close_session(&self, id: &SessionId) -> Result<bool, DomainError>;

    /// All currently active sessions (for the timeout sweep).
    async fn list_active_sessions(&self) -> Result<Vec<SessionContext>, DomainError>;

    /// The user's most recently closed session, if any (for carry-over).
    async fn latest_closed_session(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SessionContext>, DomainError>;

    /// Fetch a user profile. Returns `None` if the user is unknown.
    async fn get_user_profile(&self, user_id: &UserId)
        -> Result<Option<UserProfile>, DomainError>;

    /// Insert or replace a user profile.
    async fn put_user_profile(&self, profile: &UserProfile) -> Result<(), DomainError>;

    /// Fetch the persisted sync cursor for a user.
    async fn get_sync_cursor(&self, user_id: &UserId)
        -> Result<Option<SyncCursor>, DomainError>;

    /// Persist the sync cursor for a user.
    async fn put_sync_cursor(&self, cursor: &SyncCursor) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn context_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ContextStore) {}
    }
}
