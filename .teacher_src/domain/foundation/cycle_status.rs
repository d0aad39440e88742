//! CycleStatus enum for tracking lifecycle of decision cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl CycleStatus {
    /// Returns true if the cycle can be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, CycleStatus::Active)
    }

    /// Returns true if the cycle is finished (completed or archived).
    pub fn is_finished(&self) -> bool {
        matches!(self, CycleStatus::Completed | CycleStatus::Archived)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Active -> Completed
    /// - Active -> Archived
    /// - Completed -> Archived
    pub fn can_transition_to(&self, target: &CycleStatus) -> bool {
        use CycleStatus::*;
        matches!(
            (self, target),
            (Active, Completed) | (Active, Archived) | (Completed, Archived)
        )
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleStatus::Active => "Active",
            CycleStatus::Completed => "Completed",
            CycleStatus::Archived => "Archived",
        };
        write!(f, "{}", s)
    }
}
