//! Analysis domain events.
//!
//! Events published when analysis computations complete. These enable:
//! - Dashboard updates with computed scores
//! - WebSocket real-time notifications
//! - Audit trails for analysis computations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{
    domain_event, CycleId, EventId, Percentage, SessionId, Timestamp,
};

/// Published when Pugh matrix scores are computed for a cycle.
///
/// This event is triggered by `ComponentCompleted` for the Consequences component.
/// It contains summarized results, not raw data, to keep payload size manageable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PughScoresComputed {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// The cycle this analysis belongs to.
    pub cycle_id: CycleId,
    /// The session containing this cycle.
    pub session_id: SessionId,
    /// Map of alternative_id -> total score (sum of ratings).
    pub alternative_scores: HashMap<String, i32>,
    /// IDs of alternatives dominated by at least one other alternative.
    pub dominated_alternatives: Vec<String>,
    /// IDs of objectives that don't distinguish between alternatives.
    pub irrelevant_objectives: Vec<String>,
    /// ID of the best-scoring alternative (None if tie or empty).
    pub best_alternative_id: Option<String>,
    /// When the analysis was computed.
    pub computed_at: Timestamp,
}

domain_event!(
    PughScoresComputed,
    event_type = "analysis.pugh_scores_computed",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Analysis",
    occurred_at = computed_at,
    event_id = event_id
);

/// Scored element for Decision Quality assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DQElementScore {
    /// Name of the DQ element (e.g., "Helpful Problem Frame").
    pub element_name: String,
    /// Score for this element (0-100%).
    pub score: Percentage,
    /// Rationale for the score.
    pub rationale: String,
}

/// Published when Decision Quality scores are computed for a cycle.
///
/// This event is triggered by `ComponentCompleted` for the DecisionQuality component.
/// The overall score is the minimum of all element scores (weakest link principle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DQScoresComputed {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// The cycle this analysis belongs to.
    pub cycle_id: CycleId,
    /// The session containing this cycle.
    pub session_id: SessionId,
    /// Scores for each DQ element.
    pub element_scores: Vec<DQElementScore>,
    /// Overall DQ score (minimum of all elements).
    pub overall_score: Percentage,
    /// Name of the element with the lowest score.
    pub weakest_element: String,
    /// Suggested improvement paths for low-scoring elements.
    pub improvement_suggestions: Vec<String>,
    /// When the analysis was computed.
    pub computed_at: Timestamp,
}

domain_event!(
    DQScoresComputed,
    event_type = "analysis.dq_scores_computed",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Analysis",
    occurred_at = computed_at,
    event_id = event_id
);

/// Summary of tradeoff tensions for a single alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensionSummary {
    /// The alternative being analyzed.
    pub alternative_id: String,
    /// Human-readable name of the alternative.
    pub alternative_name: String,
    /// Objectives where this alternative outperforms others.
    pub strengths: Vec<String>,
    /// Objectives where this alternative underperforms others.
    pub weaknesses: Vec<String>,
}

/// Published when tradeoff analysis is completed for a cycle.
///
/// This event is triggered by `ComponentCompleted` for the Tradeoffs component.
/// It summarizes dominated alternatives and tension analysis for viable options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeoffsAnalyzed {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// The cycle this analysis belongs to.
    pub cycle_id: CycleId,
    /// The session containing this cycle.
    pub session_id: SessionId,
    /// Number of dominated alternatives found.
    pub dominated_count: i32,
    /// Number of irrelevant objectives found.
    pub irrelevant_count: i32,
    /// Tension summaries for non-dominated alternatives.
    pub tension_summaries: Vec<TensionSummary>,
    /// When the analysis was completed.
    pub analyzed_at: Timestamp,
}

domain_event!(
    TradeoffsAnalyzed,
    event_type = "analysis.tradeoffs_analyzed",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Analysis",
    occurred_at = analyzed_at,
    event_id = event_id
);
