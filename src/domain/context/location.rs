//! Location value object with layered precedence.
//!
//! A vendor's location is assembled from sources of unequal reliability:
//! an explicit statement ("my stall is in Shivaji Nagar") always wins,
//! landmarks ("near the railway station") support a strong inference, and
//! environmental cues ("lots of traffic here") support a weak one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Provenance;
use crate::domain::foundation::Timestamp;

/// Relative reliability of an inference source.
///
/// Ordering matters: an inference from a stronger source is never
/// overwritten by one from a weaker source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceStrength {
    /// Derived from environmental cues alone.
    Cue,
    /// Derived from a named landmark.
    Landmark,
}

/// A derived location guess with its source strength.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredLocation {
    pub value: String,
    pub strength: InferenceStrength,
}

/// Composite location state for one session.
///
/// # Invariants
///
/// - If `explicit` is non-empty, all location reads resolve to it.
/// - `landmarks` and `environmental_cues` only ever grow (set union).
/// - `inferred` is never replaced by a weaker-strength inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LocationInfo {
    explicit: Option<String>,
    explicit_at: Option<Timestamp>,
    landmarks: BTreeSet<String>,
    environmental_cues: BTreeSet<String>,
    inferred: Option<InferredLocation>,
}

impl LocationInfo {
    /// Creates an empty location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the explicit location, if stated.
    pub fn explicit(&self) -> Option<&str> {
        self.explicit.as_deref()
    }

    /// Returns when the explicit location was last produced.
    pub fn explicit_at(&self) -> Option<&Timestamp> {
        self.explicit_at.as_ref()
    }

    /// Returns the landmarks gathered so far.
    pub fn landmarks(&self) -> &BTreeSet<String> {
        &self.landmarks
    }

    /// Returns the environmental cues gathered so far.
    pub fn environmental_cues(&self) -> &BTreeSet<String> {
        &self.environmental_cues
    }

    /// Returns the current inference, if any.
    pub fn inferred(&self) -> Option<&InferredLocation> {
        self.inferred.as_ref()
    }

    /// Returns true if nothing at all is known.
    pub fn is_empty(&self) -> bool {
        self.explicit.is_none()
            && self.landmarks.is_empty()
            && self.environmental_cues.is_empty()
            && self.inferred.is_none()
    }

    /// Resolves the location for reads: explicit first, then inferred.
    pub fn resolved(&self) -> Option<&str> {
        self.explicit
            .as_deref()
            .or_else(|| self.inferred.as_ref().map(|i| i.value.as_str()))
    }

    /// Provenance of the resolved value.
    pub fn provenance(&self) -> Provenance {
        if self.explicit.is_some() {
            Provenance::Explicit
        } else if self.inferred.is_some() {
            Provenance::Inferred
        } else {
            Provenance::Unset
        }
    }

    /// Sets the explicit location, recording when it was produced.
    pub fn set_explicit(&mut self, value: impl Into<String>, produced_at: Timestamp) {
        self.explicit = Some(value.into());
        self.explicit_at = Some(produced_at);
    }

    /// Adds a landmark; returns true if it was new.
    pub fn add_landmark(&mut self, landmark: impl Into<String>) -> bool {
        self.landmarks.insert(landmark.into())
    }

    /// Adds an environmental cue; returns true if it was new.
    pub fn add_cue(&mut self, cue: impl Into<String>) -> bool {
        self.environmental_cues.insert(cue.into())
    }

    /// Installs an inference unless a stronger one is already present.
    pub fn set_inferred(&mut self, candidate: InferredLocation) -> bool {
        match &self.inferred {
            Some(current) if current.strength > candidate.strength => false,
            _ => {
                self.inferred = Some(candidate);
                true
            }
        }
    }

    /// Re-derives the inference from accumulated landmarks and cues.
    ///
    /// Landmarks produce a strong inference. Cues alone only support an
    /// inference once at least two distinct cues agree that this is a
    /// recognizable kind of place; a single cue stays a hint.
    pub fn derive_inference(&mut self) {
        if self.explicit.is_some() {
            return;
        }
        if let Some(first) = self.landmarks.iter().next() {
            self.set_inferred(InferredLocation {
                value: format!("near {}", first),
                strength: InferenceStrength::Landmark,
            });
        } else if self.environmental_cues.len() >= 2 {
            let cues: Vec<&str> = self
                .environmental_cues
                .iter()
                .take(2)
                .map(|c| c.as_str())
                .collect();
            self.set_inferred(InferredLocation {
                value: format!("{} area with {}", cues[0], cues[1]),
                strength: InferenceStrength::Cue,
            });
        }
    }

    /// True when only weak signals exist: cues without landmarks or an
    /// explicit statement. The policy narrows its next question to the
    /// missing landmark instead of re-asking for the whole location.
    pub fn cues_only(&self) -> bool {
        self.explicit.is_none() && self.landmarks.is_empty() && !self.environmental_cues.is_empty()
    }
}
