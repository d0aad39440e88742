//! SessionStatus enum for tracking the lifecycle of dialogue sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a dialogue session.
///
/// `Closed` is terminal: the only write permitted afterwards is the
/// archival timestamp recorded as part of the close itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Closed,
}

impl SessionStatus {
    /// Returns true if the session can be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Active, Closed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Active => vec![Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn active_is_mutable_closed_is_not() {
        assert!(SessionStatus::Active.is_mutable());
        assert!(!SessionStatus::Closed.is_mutable());
    }

    #[test]
    fn active_transitions_to_closed() {
        assert!(SessionStatus::Active.can_transition_to(&SessionStatus::Closed));
    }

    #[test]
    fn closed_is_terminal() {
        assert!(SessionStatus::Closed.is_terminal());
        assert!(!SessionStatus::Closed.can_transition_to(&SessionStatus::Active));
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&SessionStatus::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
    }
}
