//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions across the lifecycle enums of this core (dialogue state,
//! sync coordinator state, session status).

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for SyncState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (Offline, Detecting) |
///             (Detecting, Syncing) |
///             // ... etc
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Offline => vec![Detecting],
///             Detecting => vec![Syncing, Offline],
///             // ... etc
///         }
///     }
/// }
///
/// // Usage:
/// let next = current.transition_to(SyncState::Syncing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    ///
    /// This is the preferred way to change state, as it ensures
    /// the transition is valid according to the state machine rules.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test enum for StateMachine trait
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestPhase {
        Queued,
        Uploading,
        Applied,
        Abandoned,
    }

    impl StateMachine for TestPhase {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TestPhase::*;
            matches!(
                (self, target),
                (Queued, Uploading)
                    | (Uploading, Applied)
                    | (Uploading, Abandoned)
                    | (Queued, Abandoned)
            )
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TestPhase::*;
            match self {
                Queued => vec![Uploading, Abandoned],
                Uploading => vec![Applied, Abandoned],
                Applied => vec![],
                Abandoned => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let phase = TestPhase::Queued;
        let result = phase.transition_to(TestPhase::Uploading);
        assert_eq!(result, Ok(TestPhase::Uploading));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let phase = TestPhase::Queued;
        let result = phase.transition_to(TestPhase::Applied);
        assert!(result.is_err());
    }

    #[test]
    fn is_terminal_detects_terminal_states() {
        assert!(TestPhase::Applied.is_terminal());
        assert!(TestPhase::Abandoned.is_terminal());
        assert!(!TestPhase::Queued.is_terminal());
        assert!(!TestPhase::Uploading.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for phase in [
            TestPhase::Queued,
            TestPhase::Uploading,
            TestPhase::Applied,
            TestPhase::Abandoned,
        ] {
            for valid_target in phase.valid_transitions() {
                assert!(
                    phase.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    phase,
                    valid_target
                );
            }
        }
    }
}
