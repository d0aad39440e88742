//! SessionTimeoutSweeper - background close of inactive sessions.
//!
//! A scheduled check, idempotent on repeated firing: sessions whose
//! `last_updated` is older than the timeout transition to closed; a
//! session that saw fresh activity before the sweep fires is skipped.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info};

use super::{CloseSessionCommand, CloseSessionHandler};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::ContextStore;

/// Periodic sweep closing sessions inactive past the timeout.
pub struct SessionTimeoutSweeper {
    store: Arc<dyn ContextStore>,
    close_handler: Arc<CloseSessionHandler>,
    timeout_minutes: i64,
}

impl SessionTimeoutSweeper {
    pub fn new(
        store: Arc<dyn ContextStore>,
        close_handler: Arc<CloseSessionHandler>,
        timeout_minutes: i64,
    ) -> Self {
        Self {
            store,
            close_handler,
            timeout_minutes,
        }
    }

    /// Runs one sweep pass. Returns how many sessions were closed.
    ///
    /// Expired sessions are closed concurrently; each close serializes
    /// against live turns through the per-session lock.
    pub async fn sweep_once(&self) -> Result<usize, DomainError> {
        let now = Timestamp::now();
        let expired: Vec<_> = self
            .store
            .list_active_sessions()
            .await?
            .into_iter()
            .filter(|session| session.is_expired(&now, self.timeout_minutes))
            .collect();

        let results = join_all(expired.iter().map(|session| {
            self.close_handler.handle(CloseSessionCommand {
                session_id: session.session_id().clone(),
            })
        }))
        .await;

        let mut closed = 0;
        for (session, result) in expired.iter().zip(results) {
            if result?.was_open {
                info!(
                    target: "sahayak::session",
                    session_id = %session.session_id(),
                    idle_minutes = now.minutes_since(session.last_updated()),
                    "session timed out"
                );
                closed += 1;
            }
        }
        Ok(closed)
    }

    /// Runs the sweep on an interval until the task is aborted.
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match self.sweep_once().await {
                Ok(0) => {}
                Ok(closed) => debug!(target: "sahayak::session", closed, "sweep pass"),
                Err(err) => debug!(target: "sahayak::session", error = %err, "sweep failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryContextStore;
    use crate::application::session_locks::SessionLocks;
    use crate::domain::context::SessionContext;
    use crate::domain::foundation::{DeviceTag, SessionId, SessionStatus, UserId};

    fn sweeper(store: Arc<InMemoryContextStore>, timeout_minutes: i64) -> SessionTimeoutSweeper {
        let close_handler = Arc::new(CloseSessionHandler::new(
            store.clone(),
            Arc::new(SessionLocks::new()),
        ));
        SessionTimeoutSweeper::new(store, close_handler, timeout_minutes)
    }

    async fn stored_session(store: &InMemoryContextStore) -> SessionId {
        let context = SessionContext::new(
            SessionId::mint(&DeviceTag::local()),
            UserId::new("vendor-1").unwrap(),
        );
        store.create_session(&context).await.unwrap();
        context.session_id().clone()
    }

    #[tokio::test]
    async fn expired_sessions_are_closed() {
        let store = Arc::new(InMemoryContextStore::new());
        let session_id = stored_session(&store).await;

        // a zero-minute timeout expires everything immediately
        let sweeper = sweeper(store.clone(), 0);
        let closed = sweeper.sweep_once().await.unwrap();

        assert_eq!(closed, 1);
        let session = store
            .get_session_context(&session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Closed);
    }

    #[tokio::test]
    async fn fresh_sessions_survive_the_sweep() {
        let store = Arc::new(InMemoryContextStore::new());
        let session_id = stored_session(&store).await;

        let sweeper = sweeper(store.clone(), 30);
        let closed = sweeper.sweep_once().await.unwrap();

        assert_eq!(closed, 0);
        let session = store
            .get_session_context(&session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Active);
    }

    #[tokio::test]
    async fn repeated_sweeps_are_idempotent() {
        let store = Arc::new(InMemoryContextStore::new());
        stored_session(&store).await;

        let sweeper = sweeper(store, 0);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
    }
}
