//! In-memory Context Store for tests and the dev harness.
//!
//! # Security Note
//!
//! This adapter is for **testing and development only**. It uses
//! `.expect()` on lock operations which will panic if locks are
//! poisoned. Production devices use the SQLite adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::context::{ContextPatch, SessionContext, SyncCursor, UserProfile};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus, UserId};
use crate::ports::ContextStore;

/// HashMap-backed context store.
#[derive(Default)]
pub struct InMemoryContextStore {
    sessions: RwLock<HashMap<SessionId, SessionContext>>,
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    cursors: RwLock<HashMap<UserId, SyncCursor>>,
}

impl InMemoryContextStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Number of stored sessions (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .expect("InMemoryContextStore: sessions lock poisoned")
            .len()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn create_session(&self, context: &SessionContext) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .expect("InMemoryContextStore: sessions lock poisoned");
        sessions.insert(context.session_id().clone(), context.clone());
        Ok(())
    }

    async fn get_session_context(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionContext>, DomainError> {
        let sessions = self
            .sessions
            .read()
            .expect("InMemoryContextStore: sessions lock poisoned");
        Ok(sessions.get(id).cloned())
    }

    async fn update_context(
        &self,
        id: &SessionId,
        patch: ContextPatch,
    ) -> Result<SessionContext, DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .expect("InMemoryContextStore: sessions lock poisoned");
        let session = sessions.get_mut(id).ok_or_else(|| {
            DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
        })?;
        session.apply(patch)?;
        Ok(session.clone())
    }

    async fn close_session(&self, id: &SessionId) -> Result<bool, DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .expect("InMemoryContextStore: sessions lock poisoned");
        let session = sessions.get_mut(id).ok_or_else(|| {
            DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
        })?;
        Ok(session.close())
    }

    async fn list_active_sessions(&self) -> Result<Vec<SessionContext>, DomainError> {
        let sessions = self
            .sessions
            .read()
            .expect("InMemoryContextStore: sessions lock poisoned");
        Ok(sessions
            .values()
            .filter(|s| s.status() == SessionStatus::Active)
            .cloned()
            .collect())
    }

    async fn latest_closed_session(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SessionContext>, DomainError> {
        let sessions = self
            .sessions
            .read()
            .expect("InMemoryContextStore: sessions lock poisoned");
        Ok(sessions
            .values()
            .filter(|s| s.user_id() == user_id && s.status() == SessionStatus::Closed)
            .max_by_key(|s| *s.last_updated())
            .cloned())
    }

    async fn get_user_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, DomainError> {
        let profiles = self
            .profiles
            .read()
            .expect("InMemoryContextStore: profiles lock poisoned");
        Ok(profiles.get(user_id).cloned())
    }

    async fn put_user_profile(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let mut profiles = self
            .profiles
            .write()
            .expect("InMemoryContextStore: profiles lock poisoned");
        profiles.insert(profile.user_id().clone(), profile.clone());
        Ok(())
    }

    async fn get_sync_cursor(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SyncCursor>, DomainError> {
        let cursors = self
            .cursors
            .read()
            .expect("InMemoryContextStore: cursors lock poisoned");
        Ok(cursors.get(user_id).cloned())
    }

    async fn put_sync_cursor(&self, cursor: &SyncCursor) -> Result<(), DomainError> {
        let mut cursors = self
            .cursors
            .write()
            .expect("InMemoryContextStore: cursors lock poisoned");
        cursors.insert(cursor.user_id().clone(), cursor.clone());
        Ok(())
    }
}
