//! Decision Quality Calculator - Scoring and analysis of DQ elements.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;

/// The seven standard Decision Quality elements.
pub const DQ_ELEMENT_NAMES: &[&str] = &[
    "Helpful Problem Frame",
    "Clear Objectives",
    "Creative Alternatives",
    "Reliable Consequence Information",
    "Logically Correct Reasoning",
    "Clear Tradeoffs",
    "Commitment to Follow Through",
];

/// Threshold for "acceptable" decision quality (all elements >= 80%).
pub const DQ_ACCEPTABLE_THRESHOLD: u8 = 80;

/// A scored Decision Quality element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DQElement {
    pub name: String,
    pub score: Percentage,
    pub rationale: Option<String>,
    pub improvement_path: Option<String>,
}

impl DQElement {
    /// Creates a new DQ element with a score.
    pub fn new(name: impl Into<String>, score: u8) -> Self {
        Self {
            name: name.into(),
            score: Percentage::new(score),
            rationale: None,
            improvement_path: None,
        }
    }

    /// Creates a DQ element with rationale and improvement path.
    pub fn with_details(
        name: impl Into<String>,
        score: u8,
        rationale: impl Into<String>,
        improvement_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            score: Percentage::new(score),
            rationale: Some(rationale.into()),
            improvement_path: Some(improvement_path.into()),
        }
    }
}

/// Priority level for improvement actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Returns the display label for this priority.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Calculator for Decision Quality scores and analysis.
pub struct DQCalculator;

impl DQCalculator {
    /// Computes the overall DQ score as the minimum of all element scores.
    ///
    /// # Edge Cases
    /// - Empty elements: Returns 0%
    /// - Single element: Returns that element's score
    pub fn compute_overall(elements: &[DQElement]) -> Percentage {
        if elements.is_empty() {
            return Percentage::ZERO;
        }

        let min_score = elements
            .iter()
            .map(|e| e.score.value())
            .min()
            .unwrap_or(0);

        Percentage::new(min_score)
    }

    /// Checks if all 7 standard DQ elements are present.
    pub fn has_all_elements(elements: &[DQElement]) -> bool {
        DQ_ELEMENT_NAMES.iter().all(|required_name| {
            elements.iter().any(|e| e.name == *required_name)
        })
    }

    /// Returns the names of missing standard DQ elements.
    pub fn missing_elements(elements: &[DQElement]) -> Vec<&'static str> {
        DQ_ELEMENT_NAMES
            .iter()
            .filter(|required| !elements.iter().any(|e| e.name == **required))
            .copied()
            .collect()
    }

    /// Checks if decision quality is "acceptable" (all elements >= 80%).
    pub fn is_acceptable(elements: &[DQElement]) -> bool {
        !elements.is_empty() && elements.iter().all(|e| e.score.value() >= DQ_ACCEPTABLE_THRESHOLD)
    }

    /// Computes the improvement priority based on score.
    pub fn compute_priority(score: Percentage) -> Priority {
        match score.value() {
            0..=30 => Priority::Critical,
            31..=50 => Priority::High,
            51..=70 => Priority::Medium,
            // Percentage is constrained to 0-100, so 71+ is always Low
            _ => Priority::Low,
        }
    }

    /// Finds the weakest element (lowest score).
    pub fn find_weakest(elements: &[DQElement]) -> Option<&DQElement> {
        elements.iter().min_by_key(|e| e.score.value())
    }

    /// Returns elements sorted by score (lowest first).
    pub fn sorted_by_priority(elements: &[DQElement]) -> Vec<&DQElement> {
        let mut sorted: Vec<_> = elements.iter().collect();
        sorted.sort_by_key(|e| e.score.value());
        sorted
    }
}
