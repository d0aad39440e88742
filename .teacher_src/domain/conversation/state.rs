//! Conversation state machine.
//!
//! Defines the lifecycle states of a conversation and valid transitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of a conversation.
///
/// Conversations move through these states from creation to completion:
/// - `Initializing`: Being set up with system prompt and config
/// - `Ready`: Waiting for first user input
/// - `InProgress`: Active dialogue with user
/// - `Confirmed`: Data extracted and awaiting save
/// - `Complete`: Read-only, component finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Conversation created, loading configuration.
    #[default]
    Initializing,

    /// System prompt set, opening message added, awaiting first user input.
    Ready,

    /// Active conversation with user.
    InProgress,

    /// Data extracted, awaiting user confirmation.
    Confirmed,

    /// Component completed, conversation is read-only.
    Complete,
}

impl ConversationState {
    /// Returns true if user can send messages in this state.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::Ready | Self::InProgress | Self::Confirmed)
    }

    /// Returns true if AI can generate a response in this state.
    pub fn can_generate_response(&self) -> bool {
        matches!(self, Self::Ready | Self::InProgress | Self::Confirmed)
    }

    /// Returns true if the conversation is still modifiable.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Complete)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl StateMachine for ConversationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationState::*;
        matches!(
            (self, target),
            // Initial setup flow
            (Initializing, Ready) |
            // First user message starts the conversation
            (Ready, InProgress) |
            // User confirms extracted data
            (InProgress, Confirmed) |
            // User requests changes, go back to gathering
            (Confirmed, InProgress) |
            // Component completed from confirmed state
            (Confirmed, Complete) |
            // Direct completion (e.g., component externally completed)
            (InProgress, Complete)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationState::*;
        match self {
            Initializing => vec![Ready],
            Ready => vec![InProgress],
            InProgress => vec![Confirmed, Complete],
            Confirmed => vec![InProgress, Complete],
            Complete => vec![],
        }
    }
}
