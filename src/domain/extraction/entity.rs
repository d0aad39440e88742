//! Typed candidate facts produced by the extractor.
//!
//! Entities are ephemeral: the merger consumes them immediately and they
//! are never persisted standalone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of fact an entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    BusinessType,
    ExplicitLocation,
    Landmark,
    EnvironmentalCue,
    OperatingConditions,
    Preference,
    Declination,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityType::BusinessType => "business_type",
            EntityType::ExplicitLocation => "explicit_location",
            EntityType::Landmark => "landmark",
            EntityType::EnvironmentalCue => "environmental_cue",
            EntityType::OperatingConditions => "operating_conditions",
            EntityType::Preference => "preference",
            EntityType::Declination => "declination",
        };
        write!(f, "{}", s)
    }
}

/// A typed, confidence-scored fact extracted from raw input.
///
/// Confidence is always within [0, 1]; values below 0.5 are hints, not
/// facts, and callers treat them accordingly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: EntityType,
    pub value: String,
    pub confidence: f64,
}

impl Entity {
    /// Creates an entity, clamping confidence into [0, 1].
    pub fn new(entity_type: EntityType, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            entity_type,
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Returns true if this entity counts as a fact rather than a hint.
    pub fn is_fact(&self, floor: f64) -> bool {
        self.confidence >= floor
    }
}
