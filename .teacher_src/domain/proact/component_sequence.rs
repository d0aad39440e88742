//! ComponentSequence - Centralized ordering logic for PrOACT components.
//!
//! The PrOACT framework has a defined progression through 9 components. This module
//! consolidates all ordering logic into a single location to avoid duplication
//! across the codebase.
//!
//! # Component Order
//!
//! 1. IssueRaising → 2. ProblemFrame → 3. Objectives → 4. Alternatives →
//! 5. Consequences → 6. Tradeoffs → 7. Recommendation → 8. DecisionQuality →
//! 9. NotesNextSteps
//!
//! # Usage
//!
//! ```ignore
//! use crate::domain::proact::ComponentSequence;
//! use crate::domain::foundation::ComponentType;
//!
//! // Get the standard order
//! let all = ComponentSequence::all();
//!
//! // Navigation
//! let next = ComponentSequence::next(ComponentType::Objectives); // Some(Alternatives)
//! let prev = ComponentSequence::previous(ComponentType::Objectives); // Some(ProblemFrame)
//!
//! // Queries
//! let idx = ComponentSequence::order_index(ComponentType::Tradeoffs); // 5
//! let is_before = ComponentSequence::is_before(ComponentType::Objectives, ComponentType::Consequences); // true
//!
//! // Get all components up to and including a specific point
//! let up_to = ComponentSequence::components_up_to(ComponentType::Alternatives);
//! // [IssueRaising, ProblemFrame, Objectives, Alternatives]
//! ```

use crate::domain::foundation::ComponentType;

/// Central location for component ordering logic.
///
/// This struct provides static methods for querying the PrOACT component sequence.
/// All ordering-related logic should go through this type to maintain DRY.
pub struct ComponentSequence;

impl ComponentSequence {
    /// The canonical order of PrOACT components.
    pub const ORDER: [ComponentType; 9] = [
        ComponentType::IssueRaising,
        ComponentType::ProblemFrame,
        ComponentType::Objectives,
        ComponentType::Alternatives,
        ComponentType::Consequences,
        ComponentType::Tradeoffs,
        ComponentType::Recommendation,
        ComponentType::DecisionQuality,
        ComponentType::NotesNextSteps,
    ];

    /// Returns all component types in order.
    pub fn all() -> &'static [ComponentType; 9] {
        &Self::ORDER
    }

    /// Returns the 0-based index of a component type in the sequence.
    ///
    /// # Panics
    ///
    /// This function will never panic because all ComponentType variants are in ORDER.
    #[inline]
    pub fn order_index(ct: ComponentType) -> usize {
        Self::ORDER
            .iter()
            .position(|&c| c == ct)
            .expect("All ComponentType variants must be in ORDER")
    }

    /// Returns the next component in the sequence, or None if at the end.
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert_eq!(
    ///     ComponentSequence::next(ComponentType::Objectives),
    ///     Some(ComponentType::Alternatives)
    /// );
    /// assert_eq!(
    ///     ComponentSequence::next(ComponentType::NotesNextSteps),
    ///     None
    /// );
    /// ```
    pub fn next(ct: ComponentType) -> Option<ComponentType> {
        let idx = Self::order_index(ct);
        Self::ORDER.get(idx + 1).copied()
    }

    /// Returns the previous component in the sequence, or None if at the start.
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert_eq!(
    ///     ComponentSequence::previous(ComponentType::Objectives),
    ///     Some(ComponentType::ProblemFrame)
    /// );
    /// assert_eq!(
    ///     ComponentSequence::previous(ComponentType::IssueRaising),
    ///     None
    /// );
    /// ```
    pub fn previous(ct: ComponentType) -> Option<ComponentType> {
        let idx = Self::order_index(ct);
        if idx > 0 {
            Self::ORDER.get(idx - 1).copied()
        } else {
            None
        }
    }

    /// Returns true if component `a` comes before component `b` in the sequence.
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert!(ComponentSequence::is_before(
    ///     ComponentType::Objectives,
    ///     ComponentType::Consequences
    /// ));
    /// assert!(!ComponentSequence::is_before(
    ///     ComponentType::Tradeoffs,
    ///     ComponentType::Alternatives
    /// ));
    /// ```
    pub fn is_before(a: ComponentType, b: ComponentType) -> bool {
        Self::order_index(a) < Self::order_index(b)
    }

    /// Returns true if component `a` comes after component `b` in the sequence.
    pub fn is_after(a: ComponentType, b: ComponentType) -> bool {
        Self::order_index(a) > Self::order_index(b)
    }

    /// Returns all components up to and including the specified component.
    ///
    /// Useful for determining which components should be copied when branching a cycle.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let up_to = ComponentSequence::components_up_to(ComponentType::Alternatives);
    /// assert_eq!(up_to, vec![
    ///     ComponentType::IssueRaising,
    ///     ComponentType::ProblemFrame,
    ///     ComponentType::Objectives,
    ///     ComponentType::Alternatives,
    /// ]);
    /// ```
    pub fn components_up_to(ct: ComponentType) -> Vec<ComponentType> {
        let idx = Self::order_index(ct);
        Self::ORDER[..=idx].to_vec()
    }

    /// Returns all components after the specified component.
    ///
    /// Useful for determining which components remain to be completed.
    pub fn components_after(ct: ComponentType) -> Vec<ComponentType> {
        let idx = Self::order_index(ct);
        if idx + 1 < Self::ORDER.len() {
            Self::ORDER[idx + 1..].to_vec()
        } else {
            Vec::new()
        }
    }

    /// Returns the prerequisite component (the one that must be completed before this one).
    ///
    /// This is an alias for `previous()` that makes intent clearer in business logic.
    pub fn prerequisite(ct: ComponentType) -> Option<ComponentType> {
        Self::previous(ct)
    }

    /// Returns the first component in the sequence.
    pub fn first() -> ComponentType {
        Self::ORDER[0]
    }

    /// Returns the last component in the sequence.
    pub fn last() -> ComponentType {
        Self::ORDER[Self::ORDER.len() - 1]
    }

    /// Returns true if this is the first component in the sequence.
    pub fn is_first(ct: ComponentType) -> bool {
        ct == Self::first()
    }

    /// Returns true if this is the last component in the sequence.
    pub fn is_last(ct: ComponentType) -> bool {
        ct == Self::last()
    }

    /// Returns the distance (number of steps) between two components.
    ///
    /// Returns a positive value if `to` is after `from`, negative if before, 0 if same.
    pub fn distance(from: ComponentType, to: ComponentType) -> i32 {
        Self::order_index(to) as i32 - Self::order_index(from) as i32
    }
}
