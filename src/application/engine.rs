//! DialogueEngine - the library surface exposed to the UI layer.
//!
//! Bundles the command handlers behind one facade so a host application
//! wires ports once and talks to a single object. The Sync Coordinator
//! is constructed separately (it owns background concerns) but shares
//! the same lock registry, status board, and device identity.

use std::sync::Arc;

use crate::application::device::DeviceIdentity;
use crate::application::handlers::{
    CloseSessionCommand, CloseSessionHandler, CloseSessionResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, DialogueReply, GetSessionStateHandler,
    GetSessionStateQuery, SubmitUtteranceCommand, SubmitUtteranceHandler, UtteranceInput,
};
use crate::application::session_locks::SessionLocks;
use crate::application::sync::{SyncStatus, SyncStatusBoard};
use crate::domain::context::SessionContext;
use crate::domain::dialogue::DialoguePolicy;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::ports::{BusinessAdvisor, ContextStore, OfflineQueue, SpeechToText};

/// Policy and threshold knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub decline_budget: u8,
    pub confidence_floor: f64,
    pub transcript_floor: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            decline_budget: 2,
            confidence_floor: 0.5,
            transcript_floor: 0.7,
        }
    }
}

/// Facade over the dialogue and session handlers.
pub struct DialogueEngine {
    create_handler: CreateSessionHandler,
    close_handler: Arc<CloseSessionHandler>,
    submit_handler: SubmitUtteranceHandler,
    state_handler: GetSessionStateHandler,
    queue: Arc<dyn OfflineQueue>,
    board: Arc<SyncStatusBoard>,
}

impl DialogueEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ContextStore>,
        queue: Arc<dyn OfflineQueue>,
        advisor: Arc<dyn BusinessAdvisor>,
        stt: Arc<dyn SpeechToText>,
        device: Arc<DeviceIdentity>,
        locks: Arc<SessionLocks>,
        board: Arc<SyncStatusBoard>,
        settings: EngineSettings,
    ) -> Self {
        let policy = DialoguePolicy::new(settings.decline_budget, settings.confidence_floor);
        let close_handler = Arc::new(CloseSessionHandler::new(store.clone(), locks.clone()));
        Self {
            create_handler: CreateSessionHandler::new(store.clone(), device),
            close_handler,
            submit_handler: SubmitUtteranceHandler::new(
                store.clone(),
                queue.clone(),
                advisor,
                stt,
                locks,
                board.clone(),
                policy,
                settings.transcript_floor,
            ),
            state_handler: GetSessionStateHandler::new(store),
            queue,
            board,
        }
    }

    /// The close handler, shared with the timeout sweeper.
    pub fn close_handler(&self) -> Arc<CloseSessionHandler> {
        self.close_handler.clone()
    }

    /// Starts a new session for a user, seeding explicit facts from the
    /// user's most recent closed session.
    pub async fn create_session(
        &self,
        user_id: UserId,
    ) -> Result<CreateSessionResult, DomainError> {
        self.create_handler
            .handle(CreateSessionCommand { user_id })
            .await
    }

    /// Closes a session (idempotent).
    pub async fn close_session(
        &self,
        session_id: SessionId,
    ) -> Result<CloseSessionResult, DomainError> {
        self.close_handler
            .handle(CloseSessionCommand { session_id })
            .await
    }

    /// Processes one user turn and returns the engine's decision.
    pub async fn submit_utterance(
        &self,
        session_id: SessionId,
        input: UtteranceInput,
    ) -> Result<DialogueReply, DomainError> {
        self.submit_handler
            .handle(SubmitUtteranceCommand { session_id, input })
            .await
    }

    /// Read-only projection of one session.
    pub async fn get_session_state(
        &self,
        session_id: SessionId,
    ) -> Result<SessionContext, DomainError> {
        self.state_handler
            .handle(GetSessionStateQuery { session_id })
            .await
    }

    /// Current sync status for the UI.
    pub async fn get_sync_status(&self) -> Result<SyncStatus, DomainError> {
        let state = self.board.state();
        Ok(SyncStatus {
            is_online: state.is_online(),
            is_syncing: state.is_syncing(),
            pending_items: self.queue.pending_count().await?,
            dead_lettered: self.queue.dead_lettered().await?.len(),
            last_sync: self.board.last_sync(),
        })
    }
}
