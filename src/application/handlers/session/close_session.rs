//! CloseSessionHandler - command handler for ending a conversation.

use std::sync::Arc;

use tracing::info;

use crate::application::session_locks::SessionLocks;
use crate::domain::context::UserProfile;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::ContextStore;

/// Command to close a session.
#[derive(Debug, Clone)]
pub struct CloseSessionCommand {
    pub session_id: SessionId,
}

/// Result of a close request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseSessionResult {
    /// False when the session was already closed (the close is a no-op).
    pub was_open: bool,
}

/// Handler for closing sessions.
///
/// Closing is idempotent. On the first close the session's explicit
/// preferences are rolled up into the user profile.
pub struct CloseSessionHandler {
    store: Arc<dyn ContextStore>,
    locks: Arc<SessionLocks>,
}

impl CloseSessionHandler {
    pub fn new(store: Arc<dyn ContextStore>, locks: Arc<SessionLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn handle(
        &self,
        cmd: CloseSessionCommand,
    ) -> Result<CloseSessionResult, DomainError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        let Some(context) = self.store.get_session_context(&cmd.session_id).await? else {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", cmd.session_id),
            ));
        };

        let was_open = self.store.close_session(&cmd.session_id).await?;
        if was_open {
            let mut profile = self
                .store
                .get_user_profile(context.user_id())
                .await?
                .unwrap_or_else(|| UserProfile::new(context.user_id().clone()));
            profile.absorb_session(&context);
            self.store.put_user_profile(&profile).await?;

            info!(
                target: "sahayak::session",
                session_id = %cmd.session_id,
                "session closed"
            );
        }
        Ok(CloseSessionResult { was_open })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryContextStore;
    use crate::domain::context::{ContextPatch, Provenance, SessionContext, SlotValue};
    use crate::domain::foundation::{DeviceTag, Timestamp, UserId};
    use std::collections::BTreeMap;

    async fn stored_session(store: &InMemoryContextStore) -> SessionId {
        let context = SessionContext::new(
            SessionId::mint(&DeviceTag::local()),
            UserId::new("vendor-1").unwrap(),
        );
        store.create_session(&context).await.unwrap();
        context.session_id().clone()
    }

    fn handler(store: Arc<InMemoryContextStore>) -> CloseSessionHandler {
        CloseSessionHandler::new(store, Arc::new(SessionLocks::new()))
    }

    #[tokio::test]
    async fn closes_an_open_session() {
        let store = Arc::new(InMemoryContextStore::new());
        let session_id = stored_session(&store).await;
        let handler = handler(store.clone());

        let result = handler
            .handle(CloseSessionCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert!(result.was_open);

        // further patches are rejected
        let err = store
            .update_context(&session_id, ContextPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionClosed);
    }

    #[tokio::test]
    async fn closing_twice_is_a_no_op() {
        let store = Arc::new(InMemoryContextStore::new());
        let session_id = stored_session(&store).await;
        let handler = handler(store);

        let first = handler
            .handle(CloseSessionCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        let second = handler
            .handle(CloseSessionCommand { session_id })
            .await
            .unwrap();
        assert!(first.was_open);
        assert!(!second.was_open);
    }

    #[tokio::test]
    async fn unknown_session_is_an_error() {
        let store = Arc::new(InMemoryContextStore::new());
        let handler = handler(store);

        let err = handler
            .handle(CloseSessionCommand {
                session_id: SessionId::mint(&DeviceTag::local()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn explicit_preferences_roll_into_the_profile() {
        let store = Arc::new(InMemoryContextStore::new());
        let session_id = stored_session(&store).await;

        let mut preferences = BTreeMap::new();
        preferences.insert(
            "general".to_string(),
            SlotValue::new("fresh stock", Provenance::Explicit, 0.8, Timestamp::now()),
        );
        store
            .update_context(
                &session_id,
                ContextPatch {
                    preferences: Some(preferences),
                    ..ContextPatch::default()
                },
            )
            .await
            .unwrap();

        let handler = handler(store.clone());
        handler
            .handle(CloseSessionCommand { session_id })
            .await
            .unwrap();

        let profile = store
            .get_user_profile(&UserId::new("vendor-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(profile.preferences().contains_key("general"));
    }
}
