//! Sync coordinator state machine.
//!
//! The offline/online duality is an explicit state machine rather than
//! branching scattered through call sites, so retry, backoff, and
//! ordering invariants live in one place.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Per-device connectivity/sync state.
///
/// - `Offline`: no usable connection; writes go to the Offline Queue
/// - `Detecting`: a connectivity-restored signal arrived; reachability
///   must be confirmed before declaring online (avoids flapping)
/// - `Syncing`: draining the queue and applying server updates
/// - `Idle`: online with nothing left to drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Offline,

    Detecting,

    Syncing,

    Idle,
}

impl SyncState {
    /// Returns true if the device is confirmed online.
    pub fn is_online(&self) -> bool {
        matches!(self, SyncState::Syncing | SyncState::Idle)
    }

    /// Returns true if a sync cycle is in progress.
    pub fn is_syncing(&self) -> bool {
        matches!(self, SyncState::Syncing)
    }
}

impl StateMachine for SyncState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SyncState::*;
        matches!(
            (self, target),
            // connectivity-restored signal
            (Offline, Detecting) |
            // reachability confirmed
            (Detecting, Syncing) |
            // reachability probe failed
            (Detecting, Offline) |
            // queue drained (or only dead-lettered items remain)
            (Syncing, Idle) |
            // mid-sync connectivity loss
            (Syncing, Offline) |
            // connectivity lost while idle
            (Idle, Offline) |
            // new items arrived while online
            (Idle, Syncing)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SyncState::*;
        match self {
            Offline => vec![Detecting],
            Detecting => vec![Syncing, Offline],
            Syncing => vec![Idle, Offline],
            Idle => vec![Offline, Syncing],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_offline() {
        assert_eq!(SyncState::default(), SyncState::Offline);
    }

    #[test]
    fn offline_must_detect_before_syncing() {
        assert!(SyncState::Offline.can_transition_to(&SyncState::Detecting));
        assert!(!SyncState::Offline.can_transition_to(&SyncState::Syncing));
        assert!(!SyncState::Offline.can_transition_to(&SyncState::Idle));
    }

    #[test]
    fn detection_can_fail_back_to_offline() {
        assert!(SyncState::Detecting.can_transition_to(&SyncState::Offline));
    }

    #[test]
    fn syncing_ends_idle_or_offline() {
        assert_eq!(
            SyncState::Syncing.valid_transitions(),
            vec![SyncState::Idle, SyncState::Offline]
        );
    }

    #[test]
    fn idle_resyncs_without_re_detecting() {
        assert!(SyncState::Idle.can_transition_to(&SyncState::Syncing));
    }

    #[test]
    fn only_syncing_and_idle_are_online() {
        assert!(!SyncState::Offline.is_online());
        assert!(!SyncState::Detecting.is_online());
        assert!(SyncState::Syncing.is_online());
        assert!(SyncState::Idle.is_online());
    }

    #[test]
    fn no_state_is_terminal() {
        for state in [
            SyncState::Offline,
            SyncState::Detecting,
            SyncState::Syncing,
            SyncState::Idle,
        ] {
            assert!(!state.is_terminal());
        }
    }
}
