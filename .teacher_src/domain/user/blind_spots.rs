//! Blind spots and growth areas tracking

use crate::domain::foundation::Timestamp;
use serde::{Deserialize, Serialize};

/// Identified blind spot in decision-making
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSpot {
    pub name: String,
    pub description: String,
    pub evidence: Vec<String>,
    /// What the agent should do to address this
    pub agent_behavior: String,
    pub identified_at: Timestamp,
    pub still_active: bool,
}

impl BlindSpot {
    pub fn new(
        name: String,
        description: String,
        evidence: Vec<String>,
        agent_behavior: String,
        timestamp: Timestamp,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Blind spot name cannot be empty".to_string());
        }
        if description.trim().is_empty() {
            return Err("Description cannot be empty".to_string());
        }
        if agent_behavior.trim().is_empty() {
            return Err("Agent behavior cannot be empty".to_string());
        }

        Ok(Self {
            name,
            description,
            evidence,
            agent_behavior,
            identified_at: timestamp,
            still_active: true,
        })
    }

    /// Mark blind spot as resolved
    pub fn resolve(&mut self) {
        self.still_active = false;
    }

    /// Check if blind spot is still active
    pub fn is_active(&self) -> bool {
        self.still_active
    }
}

/// Observed improvement over time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthObservation {
    pub area: String,
    pub before_behavior: String,
    pub after_behavior: String,
    pub trigger: String,
    pub observed_at: Timestamp,
}

impl GrowthObservation {
    pub fn new(
        area: String,
        before_behavior: String,
        after_behavior: String,
        trigger: String,
        timestamp: Timestamp,
    ) -> Result<Self, String> {
        if area.trim().is_empty() {
            return Err("Area cannot be empty".to_string());
        }
        if before_behavior.trim().is_empty() || after_behavior.trim().is_empty() {
            return Err("Behaviors cannot be empty".to_string());
        }
        if trigger.trim().is_empty() {
            return Err("Trigger cannot be empty".to_string());
        }

        Ok(Self {
            area,
            before_behavior,
            after_behavior,
            trigger,
            observed_at: timestamp,
        })
    }
}

/// Blind spots and growth tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlindSpotsGrowth {
    /// Identified blind spots
    pub blind_spots: Vec<BlindSpot>,
    /// Observed improvements over time
    pub growth_areas: Vec<GrowthObservation>,
    /// Suggested focus areas
    pub suggested_focus: Vec<String>,
}

impl BlindSpotsGrowth {
    pub fn new(
        blind_spots: Vec<BlindSpot>,
        growth_areas: Vec<GrowthObservation>,
        suggested_focus: Vec<String>,
    ) -> Self {
        Self {
            blind_spots,
            growth_areas,
            suggested_focus,
        }
    }

    /// Get active blind spots
    pub fn active_blind_spots(&self) -> Vec<&BlindSpot> {
        self.blind_spots
            .iter()
            .filter(|bs| bs.is_active())
            .collect()
    }

    /// Count total blind spots
    pub fn total_blind_spots(&self) -> usize {
        self.blind_spots.len()
    }

    /// Count active blind spots
    pub fn active_count(&self) -> usize {
        self.active_blind_spots().len()
    }

    /// Count growth observations
    pub fn growth_count(&self) -> usize {
        self.growth_areas.len()
    }
}

impl Default for BlindSpotsGrowth {
    fn default() -> Self {
        Self {
            blind_spots: Vec::new(),
            growth_areas: Vec::new(),
            suggested_focus: Vec::new(),
        }
    }
}
