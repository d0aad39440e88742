//! CycleProgress value object - Progress tracking for decision cycles.
//!
//! Provides a snapshot of component completion status across a cycle,
//! with utilities for calculating overall progress and finding next steps.

use std::collections::HashMap;

use crate::domain::foundation::{ComponentStatus, ComponentType};
use crate::domain::proact::ComponentSequence;

/// A snapshot of cycle progress across all components.
///
/// This is a read-only value object that provides computed properties
/// about the current state of a cycle's components.
#[derive(Debug, Clone)]
pub struct CycleProgress {
    statuses: HashMap<ComponentType, ComponentStatus>,
}

impl CycleProgress {
    /// Creates a new progress snapshot from component statuses.
    pub fn new(statuses: HashMap<ComponentType, ComponentStatus>) -> Self {
        Self { statuses }
    }

    /// Returns the status of a specific component.
    pub fn status(&self, ct: ComponentType) -> ComponentStatus {
        self.statuses
            .get(&ct)
            .copied()
            .unwrap_or(ComponentStatus::NotStarted)
    }

    /// Returns the number of completed components.
    pub fn completed_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| s.is_complete())
            .count()
    }

    /// Returns the total number of required components (excluding optional NotesNextSteps).
    pub fn required_count(&self) -> usize {
        8 // All components except NotesNextSteps are required
    }

    /// Returns the completion percentage (0-100).
    ///
    /// Only counts required components (NotesNextSteps is optional).
    pub fn percent_complete(&self) -> u8 {
        let required_completed = ComponentSequence::all()
            .iter()
            .filter(|ct| **ct != ComponentType::NotesNextSteps)
            .filter(|ct| self.status(**ct).is_complete())
            .count();

        ((required_completed * 100) / self.required_count()) as u8
    }

    /// Returns true if all required components are complete.
    ///
    /// NotesNextSteps is optional and not required for cycle completion.
    pub fn is_complete(&self) -> bool {
        ComponentSequence::all()
            .iter()
            .filter(|ct| **ct != ComponentType::NotesNextSteps)
            .all(|ct| self.status(*ct).is_complete())
    }

    /// Returns the first incomplete component in sequence order.
    ///
    /// Returns None if all required components are complete.
    pub fn first_incomplete(&self) -> Option<ComponentType> {
        ComponentSequence::all()
            .iter()
            .filter(|ct| **ct != ComponentType::NotesNextSteps)
            .find(|ct| !self.status(**ct).is_complete())
            .copied()
    }

    /// Returns a map of all component statuses in sequence order.
    pub fn step_statuses(&self) -> Vec<(ComponentType, ComponentStatus)> {
        ComponentSequence::all()
            .iter()
            .map(|ct| (*ct, self.status(*ct)))
            .collect()
    }

    /// Returns true if any component needs revision.
    pub fn has_revisions_needed(&self) -> bool {
        self.statuses
            .values()
            .any(|s| matches!(s, ComponentStatus::NeedsRevision))
    }

    /// Returns all components that need revision.
    pub fn revisions_needed(&self) -> Vec<ComponentType> {
        ComponentSequence::all()
            .iter()
            .filter(|ct| matches!(self.status(**ct), ComponentStatus::NeedsRevision))
            .copied()
            .collect()
    }

    /// Returns the component currently in progress, if any.
    pub fn current_in_progress(&self) -> Option<ComponentType> {
        ComponentSequence::all()
            .iter()
            .find(|ct| matches!(self.status(**ct), ComponentStatus::InProgress))
            .copied()
    }
}
