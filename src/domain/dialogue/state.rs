//! Dialogue state machine.
//!
//! One state per session: gathering missing context, ready to hand turns
//! to the Business Advisor, or closed.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The dialogue lifecycle state of a session.
///
/// - `Gathering`: at least one context field still needs a question
/// - `Ready`: context is complete enough to generate guidance
/// - `Closed`: session timed out or was closed; terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Gathering,

    Ready,

    Closed,
}

impl DialogueState {
    /// Returns true if the session still accepts user input.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Returns true if guidance can be generated in this state.
    pub fn can_guide(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl StateMachine for DialogueState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialogueState::*;
        matches!(
            (self, target),
            // context completed (or declines accepted)
            (Gathering, Ready) |
            // a merge invalidated a previously-set field
            (Ready, Gathering) |
            // timeout or explicit close from either live state
            (Gathering, Closed) |
            (Ready, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogueState::*;
        match self {
            Gathering => vec![Ready, Closed],
            Ready => vec![Gathering, Closed],
            Closed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_gathering() {
        assert_eq!(DialogueState::default(), DialogueState::Gathering);
    }

    #[test]
    fn gathering_transitions_to_ready() {
        assert!(DialogueState::Gathering.can_transition_to(&DialogueState::Ready));
    }

    #[test]
    fn ready_can_return_to_gathering() {
        assert!(DialogueState::Ready.can_transition_to(&DialogueState::Gathering));
    }

    #[test]
    fn closed_is_terminal() {
        assert!(DialogueState::Closed.is_terminal());
        assert!(!DialogueState::Closed.can_transition_to(&DialogueState::Gathering));
    }

    #[test]
    fn only_ready_can_guide() {
        assert!(DialogueState::Ready.can_guide());
        assert!(!DialogueState::Gathering.can_guide());
        assert!(!DialogueState::Closed.can_guide());
    }

    #[test]
    fn closed_does_not_accept_input() {
        assert!(DialogueState::Gathering.accepts_input());
        assert!(DialogueState::Ready.accepts_input());
        assert!(!DialogueState::Closed.accepts_input());
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&DialogueState::Gathering).unwrap();
        assert_eq!(json, "\"gathering\"");
    }
}
