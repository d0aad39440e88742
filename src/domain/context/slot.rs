//! Context slots and provenance tags.
//!
//! A slot is one of the three guidance-relevant facts the engine gathers
//! about a vendor: what they sell, where they are, and when they operate.
//! Every slot value carries a provenance tag so explicit statements always
//! outrank inferred ones.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// The three gatherable context fields, in fixed question priority order.
///
/// The derived `Ord` follows declaration order, which is the priority
/// order used by the dialogue policy (business type first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    BusinessType,
    Location,
    OperatingConditions,
}

impl ContextField {
    /// All fields, highest priority first.
    pub const ALL: [ContextField; 3] = [
        ContextField::BusinessType,
        ContextField::Location,
        ContextField::OperatingConditions,
    ];

    /// Human-readable name used in questions and log lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            ContextField::BusinessType => "business type",
            ContextField::Location => "location",
            ContextField::OperatingConditions => "operating conditions",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How a fact entered the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Stated directly by the user.
    Explicit,
    /// Derived from indirect cues.
    Inferred,
    /// No value present.
    #[default]
    Unset,
}

impl Provenance {
    /// Returns true if a value is actually present.
    pub fn is_set(&self) -> bool {
        !matches!(self, Provenance::Unset)
    }

    /// Numeric rank for precedence comparisons (explicit outranks inferred).
    pub fn rank(&self) -> u8 {
        match self {
            Provenance::Explicit => 2,
            Provenance::Inferred => 1,
            Provenance::Unset => 0,
        }
    }
}

/// A provenance-tagged, confidence-scored slot value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotValue {
    pub value: String,
    pub provenance: Provenance,
    pub confidence: f64,
    pub updated_at: Timestamp,
}

impl SlotValue {
    /// Creates a slot value, clamping confidence into [0, 1].
    pub fn new(
        value: impl Into<String>,
        provenance: Provenance,
        confidence: f64,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            value: value.into(),
            provenance,
            confidence: confidence.clamp(0.0, 1.0),
            updated_at,
        }
    }
}

/// Resolved state of a slot as seen by the dialogue policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No value and the user has not declined to provide one.
    Unset,
    /// A value is present with the given provenance.
    Set(Provenance),
    /// The user declined repeatedly; the field counts as satisfied.
    UnsetAccepted,
}

impl SlotState {
    /// Returns true if the field no longer needs a question.
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, SlotState::Unset)
    }
}
