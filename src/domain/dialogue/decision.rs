//! Dialogue decisions emitted by the policy.
//!
//! The policy is pure: it reads merged context and returns a decision
//! plus updated progress bookkeeping. The caller persists any state
//! change and performs all I/O (advisor calls, store writes).

use serde::{Deserialize, Serialize};

use super::DialogueState;
use crate::domain::context::{ContextField, DialogueProgress};

/// What the engine should do with the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogueDecision {
    /// Ask a targeted question about one missing field.
    Ask {
        field: ContextField,
        question: String,
    },
    /// Forward merged context plus the current utterance to the
    /// Business Advisor for guidance.
    Guide,
    /// Ask the user to clarify or confirm without targeting a new field.
    Clarify { prompt: String },
}

impl DialogueDecision {
    /// Returns the text the user should hear for ask/clarify decisions.
    pub fn prompt_text(&self) -> Option<&str> {
        match self {
            DialogueDecision::Ask { question, .. } => Some(question),
            DialogueDecision::Clarify { prompt } => Some(prompt),
            DialogueDecision::Guide => None,
        }
    }
}

/// Full policy output for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub decision: DialogueDecision,
    pub state: DialogueState,
    /// Updated bookkeeping for the caller to persist.
    pub progress: DialogueProgress,
}
