//! Shared sync state and the status projection exposed to the UI.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::sync::{QueuedItem, SyncState};

/// Read-only sync status projection for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_syncing: bool,
    pub pending_items: usize,
    pub dead_lettered: usize,
    pub last_sync: Option<Timestamp>,
}

/// Plain-language summary of items that exhausted their retry budget.
///
/// Dead-lettered items are one of only two conditions surfaced to the
/// user (the other is a full queue).
#[derive(Debug, Clone, PartialEq)]
pub struct SyncErrorSummary {
    pub items: Vec<QueuedItem>,
}

impl SyncErrorSummary {
    /// Returns a user-facing message, or `None` when nothing failed.
    pub fn message(&self) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        Some(format!(
            "{} update(s) could not be uploaded after repeated attempts. \
             They are kept on this device; you can retry later.",
            self.items.len()
        ))
    }
}

/// Shared mutable sync state, written by the coordinator and read by
/// status queries and the dialogue path (online/offline branching).
pub struct SyncStatusBoard {
    state: RwLock<SyncState>,
    last_sync: RwLock<Option<Timestamp>>,
}

impl SyncStatusBoard {
    /// Starts offline, never synced.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SyncState::Offline),
            last_sync: RwLock::new(None),
        }
    }

    /// Returns the current coordinator state.
    pub fn state(&self) -> SyncState {
        *self
            .state
            .read()
            .expect("SyncStatusBoard: state lock poisoned")
    }

    /// Returns true if the device is confirmed online.
    pub fn is_online(&self) -> bool {
        self.state().is_online()
    }

    /// Returns when the last successful sync cycle completed.
    pub fn last_sync(&self) -> Option<Timestamp> {
        *self
            .last_sync
            .read()
            .expect("SyncStatusBoard: last_sync lock poisoned")
    }

    /// Applies a validated state transition. Returns false (leaving the
    /// state untouched) if the transition is not legal from the current
    /// state, which makes repeated signals idempotent.
    pub fn transition(&self, target: SyncState) -> bool {
        let mut state = self
            .state
            .write()
            .expect("SyncStatusBoard: state lock poisoned");
        if *state == target {
            return true;
        }
        match state.transition_to(target) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(_) => false,
        }
    }

    /// Records a completed sync cycle.
    pub fn record_sync_completed(&self) {
        let mut last = self
            .last_sync
            .write()
            .expect("SyncStatusBoard: last_sync lock poisoned");
        *last = Some(Timestamp::now());
    }
}

impl Default for SyncStatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_starts_offline() {
        let board = SyncStatusBoard::new();
        assert_eq!(board.state(), SyncState::Offline);
        assert!(!board.is_online());
        assert!(board.last_sync().is_none());
    }

    #[test]
    fn legal_transitions_apply() {
        let board = SyncStatusBoard::new();
        assert!(board.transition(SyncState::Detecting));
        assert!(board.transition(SyncState::Syncing));
        assert!(board.transition(SyncState::Idle));
        assert!(board.is_online());
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let board = SyncStatusBoard::new();
        // offline cannot jump straight to syncing
        assert!(!board.transition(SyncState::Syncing));
        assert_eq!(board.state(), SyncState::Offline);
    }

    #[test]
    fn repeated_signal_is_idempotent() {
        let board = SyncStatusBoard::new();
        assert!(board.transition(SyncState::Detecting));
        assert!(board.transition(SyncState::Detecting));
        assert_eq!(board.state(), SyncState::Detecting);
    }

    #[test]
    fn completed_sync_is_recorded() {
        let board = SyncStatusBoard::new();
        board.record_sync_completed();
        assert!(board.last_sync().is_some());
    }

    #[test]
    fn empty_summary_has_no_message() {
        let summary = SyncErrorSummary { items: Vec::new() };
        assert!(summary.message().is_none());
    }
}
