//! Values and priorities types for tracking consistent objectives

use crate::domain::foundation::{CycleId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::history::DecisionDomain;

/// Weight given to an objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveWeight {
    Low,
    Medium,
    High,
    Critical,
}

impl ObjectiveWeight {
    /// Convert to numeric score (1-4)
    pub fn to_score(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Create from frequency and importance patterns
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectiveWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// An objective that appears consistently across decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistentObjective {
    /// Name of the objective
    pub name: String,
    /// Frequency across decisions (0.0 - 1.0)
    pub frequency: f32,
    /// Typical weight given to this objective
    pub typical_weight: ObjectiveWeight,
    /// First time this objective appeared
    pub first_seen: Timestamp,
    /// Most recent appearance
    pub last_seen: Timestamp,
}

impl ConsistentObjective {
    pub fn new(
        name: String,
        frequency: f32,
        typical_weight: ObjectiveWeight,
        first_seen: Timestamp,
        last_seen: Timestamp,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Objective name cannot be empty".to_string());
        }
        if !(0.0..=1.0).contains(&frequency) {
            return Err("Frequency must be between 0.0 and 1.0".to_string());
        }

        Ok(Self {
            name,
            frequency,
            typical_weight,
            first_seen,
            last_seen,
        })
    }

    /// Check if this is a high-frequency objective (appears in 60%+ of decisions)
    pub fn is_core_value(&self) -> bool {
        self.frequency >= 0.6
    }
}

/// A tension between two values with resolution pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTension {
    /// First value in tension
    pub value_a: String,
    /// Second value in tension
    pub value_b: String,
    /// How this tension is typically resolved
    pub resolution_pattern: String,
    /// Example decisions showing this tension
    pub examples: Vec<CycleId>,
}

impl ValueTension {
    pub fn new(
        value_a: String,
        value_b: String,
        resolution_pattern: String,
        examples: Vec<CycleId>,
    ) -> Result<Self, String> {
        if value_a.trim().is_empty() || value_b.trim().is_empty() {
            return Err("Value names cannot be empty".to_string());
        }
        if resolution_pattern.trim().is_empty() {
            return Err("Resolution pattern cannot be empty".to_string());
        }

        Ok(Self {
            value_a,
            value_b,
            resolution_pattern,
            examples,
        })
    }
}

/// Values and priorities identified across decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesPriorities {
    /// Objectives that appear frequently
    pub consistent_objectives: Vec<ConsistentObjective>,
    /// Observed tensions between values
    pub value_tensions: Vec<ValueTension>,
    /// Domain-specific value patterns (objective names by domain)
    pub domain_patterns: HashMap<DecisionDomain, Vec<String>>,
}

impl ValuesPriorities {
    pub fn new(
        consistent_objectives: Vec<ConsistentObjective>,
        value_tensions: Vec<ValueTension>,
        domain_patterns: HashMap<DecisionDomain, Vec<String>>,
    ) -> Self {
        Self {
            consistent_objectives,
            value_tensions,
            domain_patterns,
        }
    }

    /// Get core values (frequency >= 60%)
    pub fn core_values(&self) -> Vec<&ConsistentObjective> {
        self.consistent_objectives
            .iter()
            .filter(|obj| obj.is_core_value())
            .collect()
    }

    /// Count total consistent objectives
    pub fn objective_count(&self) -> usize {
        self.consistent_objectives.len()
    }

    /// Count value tensions
    pub fn tension_count(&self) -> usize {
        self.value_tensions.len()
    }
}

impl Default for ValuesPriorities {
    fn default() -> Self {
        Self {
            consistent_objectives: Vec::new(),
            value_tensions: Vec::new(),
            domain_patterns: HashMap::new(),
        }
    }
}
