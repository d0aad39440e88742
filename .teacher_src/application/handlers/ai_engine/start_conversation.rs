//! StartConversationHandler - Initialize AI conversation for a cycle

use std::sync::Arc;

use crate::domain::ai_engine::ConversationState;
use crate::domain::foundation::{ComponentType, CycleId, DomainError, SessionId};
use crate::ports::{StateStorage, StateStorageError};

/// Command to start an AI conversation
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    pub cycle_id: CycleId,
    pub session_id: SessionId,
    pub initial_component: ComponentType,
}

/// Result of starting a conversation
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub state: ConversationState,
}

/// Error type for starting conversations
#[derive(Debug, Clone)]
pub enum StartConversationError {
    /// Conversation already exists for this cycle
    AlreadyExists(CycleId),
    /// Storage error
    Storage(String),
    /// Domain error
    Domain(DomainError),
}

impl std::fmt::Display for StartConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartConversationError::AlreadyExists(id) => {
                write!(f, "Conversation already exists for cycle: {}", id)
            }
            StartConversationError::Storage(err) => write!(f, "Storage error: {}", err),
            StartConversationError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StartConversationError {}

impl From<DomainError> for StartConversationError {
    fn from(err: DomainError) -> Self {
        StartConversationError::Domain(err)
    }
}

impl From<StateStorageError> for StartConversationError {
    fn from(err: StateStorageError) -> Self {
        StartConversationError::Storage(err.to_string())
    }
}

/// Handler for starting AI conversations
pub struct StartConversationHandler {
    storage: Arc<dyn StateStorage>,
}

impl StartConversationHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, StartConversationError> {
        // 1. Check if conversation already exists
        if self.storage.exists(cmd.cycle_id).await? {
            return Err(StartConversationError::AlreadyExists(cmd.cycle_id));
        }

        // 2. Create new conversation state
        let state = ConversationState::new(cmd.cycle_id, cmd.session_id, cmd.initial_component);

        // 3. Persist state
        self.storage.save_state(cmd.cycle_id, &state).await?;

        Ok(StartConversationResult { state })
    }
}
