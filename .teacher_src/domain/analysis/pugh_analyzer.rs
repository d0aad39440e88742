//! Pugh Analyzer - Score computation, dominance detection, and irrelevant objective identification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ConsequencesTable;

/// An alternative that is dominated by another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominatedAlternative {
    pub alternative_id: String,
    pub dominated_by_id: String,
    pub explanation: String,
}

impl DominatedAlternative {
    /// Creates a new dominated alternative record.
    pub fn new(
        alternative_id: impl Into<String>,
        dominated_by_id: impl Into<String>,
    ) -> Self {
        Self {
            alternative_id: alternative_id.into(),
            dominated_by_id: dominated_by_id.into(),
            explanation: String::new(),
        }
    }

    /// Creates with an explanation.
    pub fn with_explanation(
        alternative_id: impl Into<String>,
        dominated_by_id: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            alternative_id: alternative_id.into(),
            dominated_by_id: dominated_by_id.into(),
            explanation: explanation.into(),
        }
    }
}

/// An objective that doesn't distinguish between alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrelevantObjective {
    pub objective_id: String,
    pub uniform_rating: i8,
    pub reason: String,
}

impl IrrelevantObjective {
    /// Creates a new irrelevant objective record.
    pub fn new(objective_id: impl Into<String>, uniform_rating: i8) -> Self {
        Self {
            objective_id: objective_id.into(),
            uniform_rating,
            reason: "All alternatives have the same rating".to_string(),
        }
    }
}

/// Pugh matrix analysis functions.
pub struct PughAnalyzer;

impl PughAnalyzer {
    /// Computes Pugh scores for each alternative.
    ///
    /// # Algorithm
    /// For each alternative: score = Σ(rating[objective])
    ///
    /// # Edge Cases
    /// - Empty table: Returns empty HashMap
    /// - Single alternative: Returns score for that alternative
    /// - No objectives: Returns 0 for all alternatives
    /// - Missing cells: Treated as 0 (neutral)
    pub fn compute_scores(table: &ConsequencesTable) -> HashMap<String, i32> {
        let mut scores = HashMap::new();

        if table.alternative_ids.is_empty() {
            return scores;
        }

        for alt_id in &table.alternative_ids {
            let mut total: i32 = 0;

            for obj_id in &table.objective_ids {
                let rating = table
                    .get_cell(alt_id, obj_id)
                    .map(|c| c.rating.value() as i32)
                    .unwrap_or(0);
                total += rating;
            }

            scores.insert(alt_id.clone(), total);
        }

        scores
    }

    /// Finds all dominated alternatives.
    ///
    /// Alternative A dominates Alternative B if:
    /// 1. A >= B on ALL objectives
    /// 2. A > B on AT LEAST ONE objective
    ///
    /// # Edge Cases
    /// - Empty table: Returns empty Vec
    /// - Single alternative: Returns empty Vec (can't dominate self)
    /// - Ties: Neither dominates if equal on all objectives
    pub fn find_dominated(table: &ConsequencesTable) -> Vec<DominatedAlternative> {
        let mut dominated = Vec::new();

        if table.alternative_ids.len() < 2 {
            return dominated;
        }

        for candidate in &table.alternative_ids {
            for potential_dominator in &table.alternative_ids {
                if candidate == potential_dominator {
                    continue;
                }

                if Self::dominates(table, potential_dominator, candidate) {
                    dominated.push(DominatedAlternative::with_explanation(
                        candidate.clone(),
                        potential_dominator.clone(),
                        Self::explain_dominance(table, potential_dominator, candidate),
                    ));
                    break; // Only need one dominator per candidate
                }
            }
        }

        dominated
    }

    /// Checks if alternative `a` dominates alternative `b`.
    fn dominates(table: &ConsequencesTable, a: &str, b: &str) -> bool {
        let mut at_least_equal = true;
        let mut strictly_better_on_one = false;

        for obj_id in &table.objective_ids {
            let a_rating = table
                .get_cell(a, obj_id)
                .map(|c| c.rating.value())
                .unwrap_or(0);
            let b_rating = table
                .get_cell(b, obj_id)
                .map(|c| c.rating.value())
                .unwrap_or(0);

            if a_rating < b_rating {
                at_least_equal = false;
                break;
            }

            if a_rating > b_rating {
                strictly_better_on_one = true;
            }
        }

        at_least_equal && strictly_better_on_one
    }

    /// Generates explanation for why `a` dominates `b`.
    fn explain_dominance(table: &ConsequencesTable, a: &str, b: &str) -> String {
        let mut better_on = Vec::new();

        for obj_id in &table.objective_ids {
            let a_rating = table
                .get_cell(a, obj_id)
                .map(|c| c.rating.value())
                .unwrap_or(0);
            let b_rating = table
                .get_cell(b, obj_id)
                .map(|c| c.rating.value())
                .unwrap_or(0);

            if a_rating > b_rating {
                better_on.push(obj_id.as_str());
            }
        }

        format!(
            "{} is at least as good on all objectives and strictly better on: {}",
            a,
            better_on.join(", ")
        )
    }

    /// Finds objectives that don't distinguish between alternatives.
    ///
    /// An objective is irrelevant if all alternatives have the same rating on it.
    ///
    /// # Edge Cases
    /// - Single alternative: Returns empty Vec (no comparison possible)
    /// - All objectives vary: Returns empty Vec
    pub fn find_irrelevant_objectives(table: &ConsequencesTable) -> Vec<IrrelevantObjective> {
        let mut irrelevant = Vec::new();

        // Need at least 2 alternatives to compare
        if table.alternative_ids.len() < 2 {
            return irrelevant;
        }

        for obj_id in &table.objective_ids {
            let ratings: Vec<i8> = table
                .alternative_ids
                .iter()
                .map(|alt_id| {
                    table
                        .get_cell(alt_id, obj_id)
                        .map(|c| c.rating.value())
                        .unwrap_or(0)
                })
                .collect();

            if !ratings.is_empty() && Self::all_same(&ratings) {
                irrelevant.push(IrrelevantObjective::new(obj_id.clone(), ratings[0]));
            }
        }

        irrelevant
    }

    /// Checks if all values in the slice are the same.
    fn all_same(ratings: &[i8]) -> bool {
        if ratings.is_empty() {
            return true;
        }
        let first = ratings[0];
        ratings.iter().all(|&r| r == first)
    }

    /// Finds the best alternative by total score.
    /// Returns None if empty or if there's a tie for best.
    pub fn find_best(table: &ConsequencesTable) -> Option<String> {
        let scores = Self::compute_scores(table);

        if scores.is_empty() {
            return None;
        }

        let max_score = scores.values().max()?;
        let best: Vec<_> = scores
            .iter()
            .filter(|(_, &score)| score == *max_score)
            .map(|(id, _)| id.clone())
            .collect();

        // Return None on tie
        if best.len() == 1 {
            Some(best.into_iter().next().unwrap())
        } else {
            None
        }
    }
}
