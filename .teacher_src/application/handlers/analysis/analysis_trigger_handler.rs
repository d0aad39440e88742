//! AnalysisTriggerHandler - Event handler for ComponentCompleted events.
//!
//! Listens for component completions and triggers the appropriate analysis:
//! - Consequences completion → Pugh matrix analysis → PughScoresComputed
//! - Tradeoffs completion → Tradeoff analysis → TradeoffsAnalyzed
//! - DecisionQuality completion → DQ calculation → DQScoresComputed
//!
//! This enables the dashboard to show computed analysis results in real-time.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::analysis::{
    ConsequencesTable, ConsequencesTableBuilder, DQCalculator, DQElement,
    DQElementScore, DQScoresComputed, PughAnalyzer, PughScoresComputed,
    TensionSummary, TradeoffAnalyzer, TradeoffsAnalyzed,
};
use crate::domain::foundation::{
    ComponentType, CycleId, DomainError, ErrorCode, EventEnvelope, EventId, Percentage, Rating,
    SerializableDomainEvent, SessionId, Timestamp,
};
use crate::ports::{CycleReader, EventHandler, EventPublisher};

/// External ComponentCompleted event from the Cycle module.
///
/// This is the expected payload format for `component.completed` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCompletedPayload {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component that was completed.
    pub component_type: ComponentType,
    /// When the component was completed.
    pub completed_at: Timestamp,
}

/// Handles ComponentCompleted events to trigger analysis computations.
///
/// When specific components complete, this handler:
/// 1. Fetches the component output from the cycle
/// 2. Runs the appropriate analysis function
/// 3. Publishes the computed analysis event
///
/// This maintains eventual consistency for analysis results.
pub struct AnalysisTriggerHandler {
    cycle_reader: Arc<dyn CycleReader>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AnalysisTriggerHandler {
    /// Creates a new AnalysisTriggerHandler.
    pub fn new(
        cycle_reader: Arc<dyn CycleReader>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_reader,
            event_publisher,
        }
    }

    /// Handles Consequences component completion.
    ///
    /// Fetches consequences table data, runs Pugh analysis, and publishes results.
    async fn handle_consequences_completed(
        &self,
        cycle_id: CycleId,
        session_id: SessionId,
        causation_id: &str,
    ) -> Result<(), DomainError> {
        // Fetch consequences component output
        let output_view = self
            .cycle_reader
            .get_component_output(&cycle_id, ComponentType::Consequences)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ComponentNotFound,
                    "Consequences component output not found",
                )
            })?;

        // Parse consequences table from output
        let table = self.parse_consequences_table(&output_view.output)?;

        // Run Pugh analysis
        let scores = PughAnalyzer::compute_scores(&table);
        let dominated = PughAnalyzer::find_dominated(&table);
        let irrelevant = PughAnalyzer::find_irrelevant_objectives(&table);

        // Find best alternative (highest score)
        let best_alternative_id = scores
            .iter()
            .max_by_key(|(_, score)| *score)
            .map(|(id, _)| id.clone());

        // Build event
        let event = PughScoresComputed {
            event_id: EventId::new(),
            cycle_id,
            session_id,
            alternative_scores: scores,
            dominated_alternatives: dominated.iter().map(|d| d.alternative_id.clone()).collect(),
            irrelevant_objectives: irrelevant.iter().map(|i| i.objective_id.clone()).collect(),
            best_alternative_id,
            computed_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().with_causation_id(causation_id);
        self.event_publisher.publish(envelope).await?;

        debug!(
            cycle_id = %cycle_id,
            "Published PughScoresComputed event"
        );

        Ok(())
    }

    /// Handles DecisionQuality component completion.
    ///
    /// Fetches DQ element scores, computes overall, and publishes results.
    async fn handle_dq_completed(
        &self,
        cycle_id: CycleId,
        session_id: SessionId,
        causation_id: &str,
    ) -> Result<(), DomainError> {
        // Fetch DQ component output
        let output_view = self
            .cycle_reader
            .get_component_output(&cycle_id, ComponentType::DecisionQuality)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ComponentNotFound,
                    "DecisionQuality component output not found",
                )
            })?;

        // Parse DQ elements from output
        let elements = self.parse_dq_elements(&output_view.output)?;

        // Compute overall score
        let overall_score = DQCalculator::compute_overall(&elements);

        // Find weakest element
        let weakest = DQCalculator::find_weakest(&elements)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        // Get sorted elements for improvement suggestions
        let sorted = DQCalculator::sorted_by_priority(&elements);
        let improvement_suggestions: Vec<String> = sorted
            .iter()
            .filter(|e| e.score.value() < 80)
            .filter_map(|e| {
                e.improvement_path.clone().or_else(|| {
                    Some(format!("Improve {} (currently at {}%)", e.name, e.score.value()))
                })
            })
            .collect();

        // Build element scores for event
        let element_scores: Vec<DQElementScore> = elements
            .iter()
            .map(|e| DQElementScore {
                element_name: e.name.clone(),
                score: e.score,
                rationale: e.rationale.clone().unwrap_or_default(),
            })
            .collect();

        // Build event
        let event = DQScoresComputed {
            event_id: EventId::new(),
            cycle_id,
            session_id,
            element_scores,
            overall_score,
            weakest_element: weakest,
            improvement_suggestions,
            computed_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().with_causation_id(causation_id);
        self.event_publisher.publish(envelope).await?;

        debug!(
            cycle_id = %cycle_id,
            overall_score = %overall_score,
            "Published DQScoresComputed event"
        );

        Ok(())
    }

    /// Handles Tradeoffs component completion.
    ///
    /// Fetches analysis data, computes tensions, and publishes results.
    async fn handle_tradeoffs_completed(
        &self,
        cycle_id: CycleId,
        session_id: SessionId,
        causation_id: &str,
    ) -> Result<(), DomainError> {
        // Fetch consequences table for tradeoff analysis
        let consequences_output = self
            .cycle_reader
            .get_component_output(&cycle_id, ComponentType::Consequences)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ComponentNotFound,
                    "Consequences component output not found for tradeoff analysis",
                )
            })?;

        let table = self.parse_consequences_table(&consequences_output.output)?;

        // Get dominated alternatives and irrelevant objectives
        let dominated = PughAnalyzer::find_dominated(&table);
        let irrelevant = PughAnalyzer::find_irrelevant_objectives(&table);

        // Analyze tensions for non-dominated alternatives
        let tensions = TradeoffAnalyzer::analyze_tensions(&table, &dominated);

        // Build tension summaries for non-dominated alternatives
        let tension_summaries: Vec<TensionSummary> = tensions
            .iter()
            .map(|t| TensionSummary {
                alternative_id: t.alternative_id.clone(),
                alternative_name: t.alternative_id.clone(), // Could be enhanced with actual names
                strengths: t.gains.clone(),
                weaknesses: t.losses.clone(),
            })
            .collect();

        // Build event
        let event = TradeoffsAnalyzed {
            event_id: EventId::new(),
            cycle_id,
            session_id,
            dominated_count: dominated.len() as i32,
            irrelevant_count: irrelevant.len() as i32,
            tension_summaries,
            analyzed_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().with_causation_id(causation_id);
        self.event_publisher.publish(envelope).await?;

        debug!(
            cycle_id = %cycle_id,
            dominated_count = dominated.len(),
            "Published TradeoffsAnalyzed event"
        );

        Ok(())
    }

    /// Parses a ConsequencesTable from component output JSON.
    fn parse_consequences_table(
        &self,
        output: &serde_json::Value,
    ) -> Result<ConsequencesTable, DomainError> {
        // Try to deserialize directly if format matches
        if let Ok(table) = serde_json::from_value::<ConsequencesTable>(output.clone()) {
            return Ok(table);
        }

        // Otherwise, build from structured fields
        let alternatives = output
            .get("alternatives")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ValidationFailed, "Missing alternatives in output")
            })?;

        let objectives = output
            .get("objectives")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ValidationFailed, "Missing objectives in output")
            })?;

        // Collect alternative and objective IDs
        let alt_ids: Vec<String> = alternatives
            .iter()
            .filter_map(|alt| alt.get("id").and_then(|v| v.as_str()).map(|s| s.to_string()))
            .collect();

        let obj_ids: Vec<String> = objectives
            .iter()
            .filter_map(|obj| obj.get("id").and_then(|v| v.as_str()).map(|s| s.to_string()))
            .collect();

        // Build with collected IDs
        let mut builder = ConsequencesTableBuilder::new()
            .alternatives(alt_ids)
            .objectives(obj_ids);

        // Add ratings from cells array or nested structure
        if let Some(cells) = output.get("cells").and_then(|v| v.as_array()) {
            for cell in cells {
                let alt_id = cell
                    .get("alternative_id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let obj_id = cell
                    .get("objective_id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let rating_value = cell
                    .get("rating")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(0) as i8;

                if !alt_id.is_empty() && !obj_id.is_empty() {
                    // Clamp rating value to valid range and convert
                    let clamped = rating_value.clamp(-2, 2);
                    let rating = Rating::try_from_i8(clamped).unwrap_or_default();
                    builder = builder.cell(alt_id, obj_id, rating);
                }
            }
        }

        Ok(builder.build())
    }

    /// Parses DQ elements from component output JSON.
    fn parse_dq_elements(
        &self,
        output: &serde_json::Value,
    ) -> Result<Vec<DQElement>, DomainError> {
        // Try to deserialize from elements array
        let elements_json = output
            .get("elements")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ValidationFailed,
                    "Missing elements array in DQ output",
                )
            })?;

        let mut elements = Vec::new();
        for elem in elements_json {
            let name = elem
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string();

            let score = elem
                .get("score")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u8;

            let rationale = elem
                .get("rationale")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());

            let improvement_path = elem
                .get("improvement_path")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());

            elements.push(DQElement {
                name,
                score: Percentage::new(score),
                rationale,
                improvement_path,
            });
        }

        if elements.is_empty() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "No DQ elements found in output",
            ));
        }

        Ok(elements)
    }
}

#[async_trait]
impl EventHandler for AnalysisTriggerHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        // Parse component completed event
        let payload: ComponentCompletedPayload = serde_json::from_value(event.payload.clone())
            .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;

        // Get cycle info to find session_id
        let cycle_view = self
            .cycle_reader
            .get_by_id(&payload.cycle_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::CycleNotFound,
                    format!("Cycle not found: {}", payload.cycle_id),
                )
            })?;

        let session_id = cycle_view.session_id;
        let causation_id = event.event_id.as_str();

        // Handle based on component type
        match payload.component_type {
            ComponentType::Consequences => {
                self.handle_consequences_completed(payload.cycle_id, session_id, causation_id)
                    .await?;
            }
            ComponentType::DecisionQuality => {
                self.handle_dq_completed(payload.cycle_id, session_id, causation_id)
                    .await?;
            }
            ComponentType::Tradeoffs => {
                self.handle_tradeoffs_completed(payload.cycle_id, session_id, causation_id)
                    .await?;
            }
            _ => {
                // Other component types don't trigger analysis
                debug!(
                    component_type = ?payload.component_type,
                    "Component completion does not trigger analysis"
                );
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "AnalysisTriggerHandler"
    }
}
