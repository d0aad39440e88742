//! Tradeoff Analyzer - Tension analysis for non-dominated alternatives.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use super::{ConsequencesTable, DominatedAlternative};

/// Tension analysis for a single alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tension {
    pub alternative_id: String,
    /// Objectives where this alternative outperforms at least one other non-dominated alternative.
    pub gains: Vec<String>,
    /// Objectives where this alternative underperforms at least one other non-dominated alternative.
    pub losses: Vec<String>,
    /// Optional uncertainty impact assessment.
    pub uncertainty_impact: Option<String>,
}

impl Tension {
    /// Creates a new tension record.
    pub fn new(alternative_id: impl Into<String>) -> Self {
        Self {
            alternative_id: alternative_id.into(),
            gains: Vec::new(),
            losses: Vec::new(),
            uncertainty_impact: None,
        }
    }

    /// Creates a tension with gains and losses.
    pub fn with_tradeoffs(
        alternative_id: impl Into<String>,
        gains: Vec<String>,
        losses: Vec<String>,
    ) -> Self {
        Self {
            alternative_id: alternative_id.into(),
            gains,
            losses,
            uncertainty_impact: None,
        }
    }

    /// Returns true if this alternative has no losses.
    pub fn is_clear_winner(&self) -> bool {
        !self.gains.is_empty() && self.losses.is_empty()
    }

    /// Returns true if this alternative has pure tradeoffs (both gains and losses).
    pub fn has_tradeoffs(&self) -> bool {
        !self.gains.is_empty() && !self.losses.is_empty()
    }
}

/// Summary of tradeoff analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeoffSummary {
    pub total_alternatives: usize,
    pub has_clear_winner: bool,
    pub most_balanced: Option<String>,
    pub most_polarizing: Option<String>,
}

/// Analyzer for alternative tensions and tradeoffs.
pub struct TradeoffAnalyzer;

impl TradeoffAnalyzer {
    /// Analyzes tensions for non-dominated alternatives.
    ///
    /// A tension exists when choosing one alternative means:
    /// - Gaining on some objectives (where this alt is better than others)
    /// - Losing on other objectives (where this alt is worse than others)
    ///
    /// # Edge Cases
    /// - All dominated: Returns empty Vec
    /// - Single non-dominated: Returns single tension with empty gains/losses
    pub fn analyze_tensions(
        table: &ConsequencesTable,
        dominated: &[DominatedAlternative],
    ) -> Vec<Tension> {
        let dominated_ids: HashSet<_> = dominated.iter().map(|d| d.alternative_id.as_str()).collect();

        let viable: Vec<_> = table
            .alternative_ids
            .iter()
            .filter(|id| !dominated_ids.contains(id.as_str()))
            .collect();

        // Edge case: fewer than 2 viable alternatives
        if viable.is_empty() {
            return Vec::new();
        }

        if viable.len() == 1 {
            return vec![Tension::new(viable[0].clone())];
        }

        let mut tensions = Vec::new();

        for alt_id in &viable {
            let mut gains = HashSet::new();
            let mut losses = HashSet::new();

            // Compare against OTHER non-dominated alternatives
            for other_id in &viable {
                if *other_id == *alt_id {
                    continue;
                }

                for obj_id in &table.objective_ids {
                    let my_rating = table
                        .get_cell(alt_id, obj_id)
                        .map(|c| c.rating.value())
                        .unwrap_or(0);
                    let other_rating = table
                        .get_cell(other_id, obj_id)
                        .map(|c| c.rating.value())
                        .unwrap_or(0);

                    match my_rating.cmp(&other_rating) {
                        Ordering::Greater => {
                            gains.insert(obj_id.clone());
                        }
                        Ordering::Less => {
                            losses.insert(obj_id.clone());
                        }
                        Ordering::Equal => {}
                    }
                }
            }

            tensions.push(Tension::with_tradeoffs(
                (*alt_id).clone(),
                gains.into_iter().collect(),
                losses.into_iter().collect(),
            ));
        }

        tensions
    }

    /// Summarizes tradeoff analysis results.
    pub fn summarize_tradeoffs(tensions: &[Tension]) -> TradeoffSummary {
        if tensions.is_empty() {
            return TradeoffSummary {
                total_alternatives: 0,
                has_clear_winner: false,
                most_balanced: None,
                most_polarizing: None,
            };
        }

        // Clear winner: has gains but NO losses
        let has_clear_winner = tensions.iter().any(|t| t.is_clear_winner());

        // Most balanced: smallest absolute difference between gains and losses
        let most_balanced = tensions
            .iter()
            .min_by_key(|t| (t.gains.len() as i32 - t.losses.len() as i32).abs())
            .map(|t| t.alternative_id.clone());

        // Most polarizing: largest total of gains + losses
        let most_polarizing = tensions
            .iter()
            .max_by_key(|t| t.gains.len() + t.losses.len())
            .map(|t| t.alternative_id.clone());

        TradeoffSummary {
            total_alternatives: tensions.len(),
            has_clear_winner,
            most_balanced,
            most_polarizing,
        }
    }

    /// Finds alternatives with no losses (potential clear winners).
    pub fn find_clear_winners(tensions: &[Tension]) -> Vec<&Tension> {
        tensions.iter().filter(|t| t.is_clear_winner()).collect()
    }

    /// Calculates the "tradeoff intensity" for an alternative.
    /// Higher values mean more objectives are in contention.
    pub fn tradeoff_intensity(tension: &Tension) -> usize {
        tension.gains.len() + tension.losses.len()
    }
}
