//! Proactive questioning policy.
//!
//! Pure synchronous logic over already-resolved context: no I/O, no
//! store access. Each turn the policy picks the single highest-priority
//! missing field, narrows its question when the previous answer was
//! partial, honors repeated declines, and hands complete contexts to the
//! guidance path.

use super::{DialogueDecision, DialogueState, PolicyOutcome};
use crate::domain::context::{ContextField, DialogueProgress, MergeReport, SessionContext};
use crate::domain::extraction::{EntityType, ExtractedContext};
use crate::domain::foundation::SessionStatus;

/// Default number of consecutive declines before a field is accepted
/// as unset.
pub const DEFAULT_DECLINE_BUDGET: u8 = 2;

/// Default confidence floor separating facts from hints.
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.5;

/// The per-session questioning state machine.
#[derive(Debug, Clone)]
pub struct DialoguePolicy {
    decline_budget: u8,
    confidence_floor: f64,
}

impl Default for DialoguePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DECLINE_BUDGET, DEFAULT_CONFIDENCE_FLOOR)
    }
}

impl DialoguePolicy {
    /// Creates a policy with the given decline budget and fact floor.
    pub fn new(decline_budget: u8, confidence_floor: f64) -> Self {
        Self {
            decline_budget: decline_budget.max(1),
            confidence_floor: confidence_floor.clamp(0.0, 1.0),
        }
    }

    /// Decides what to do with the current turn.
    ///
    /// Reads the merged context and the merge report; returns a decision
    /// plus the progress bookkeeping for the caller to persist. Never
    /// mutates anything itself.
    pub fn decide(
        &self,
        context: &SessionContext,
        extracted: &ExtractedContext,
        report: &MergeReport,
    ) -> PolicyOutcome {
        let mut progress = context.progress().clone();

        if context.status() == SessionStatus::Closed {
            return PolicyOutcome {
                decision: DialogueDecision::Clarify {
                    prompt: "That conversation has ended. Let us start a fresh one.".to_string(),
                },
                state: DialogueState::Closed,
                progress,
            };
        }

        // Decline bookkeeping for the field the last question targeted.
        if let Some(asked) = progress.last_asked() {
            if extracted.declined {
                let streak = progress.record_decline(asked);
                if streak >= self.decline_budget {
                    progress.accept_unset(asked);
                    progress.clear_last_asked();
                }
            } else if self.addressed(asked, extracted) {
                progress.reset_declines(asked);
            }
        }

        // A contradicted explicit field re-enters gathering for one
        // confirming clarification, at most once per contradiction.
        if let Some(&field) = report.contradicted.iter().min() {
            if progress.pending_confirmation() != Some(field) {
                progress.set_pending_confirmation(field);
                return PolicyOutcome {
                    decision: DialogueDecision::Clarify {
                        prompt: self.confirmation_prompt(field, context),
                    },
                    state: DialogueState::Gathering,
                    progress,
                };
            }
            // contradicted again while confirming: the newest value stands
            progress.clear_pending_confirmation();
        } else if progress.pending_confirmation().is_some() {
            // the follow-up turn did not contradict: treat as confirmed
            progress.clear_pending_confirmation();
        }

        let missing: Vec<ContextField> = ContextField::ALL
            .iter()
            .copied()
            .filter(|field| !context.slot_state(*field).is_satisfied())
            .collect();

        let Some(&field) = missing.first() else {
            progress.clear_last_asked();
            return PolicyOutcome {
                decision: DialogueDecision::Guide,
                state: DialogueState::Ready,
                progress,
            };
        };

        let question = if progress.last_asked() == Some(field) {
            self.follow_up_question(field, context, extracted)
                .unwrap_or_else(|| self.repeat_question(field, &progress))
        } else {
            self.question_for(field)
        };
        progress.record_ask(field);

        PolicyOutcome {
            decision: DialogueDecision::Ask { field, question },
            state: DialogueState::Gathering,
            progress,
        }
    }

    /// True if the extraction carries a fact-grade signal for `field`.
    fn addressed(&self, field: ContextField, extracted: &ExtractedContext) -> bool {
        match field {
            ContextField::BusinessType => extracted
                .business_type
                .as_ref()
                .map_or(false, |c| c.confidence >= self.confidence_floor),
            ContextField::Location => extracted
                .location
                .as_ref()
                .map_or(false, |l| !l.is_empty()),
            ContextField::OperatingConditions => {
                extracted.operating_conditions.is_some()
                    || extracted.entities.iter().any(|e| {
                        e.entity_type == EntityType::OperatingConditions
                            && e.confidence >= self.confidence_floor
                    })
            }
        }
    }

    /// Narrower follow-up when the last answer was partial: it matched
    /// the asked field but left a sub-detail unresolved.
    fn follow_up_question(
        &self,
        field: ContextField,
        context: &SessionContext,
        extracted: &ExtractedContext,
    ) -> Option<String> {
        match field {
            ContextField::Location => {
                let mentioned = extracted
                    .location
                    .as_ref()
                    .map_or(false, |l| !l.is_empty());
                if mentioned && context.location().cues_only() {
                    let cue = context
                        .location()
                        .environmental_cues()
                        .iter()
                        .next()
                        .cloned()
                        .unwrap_or_else(|| "spot".to_string());
                    return Some(format!(
                        "Sounds like a busy {}. Which landmark or area is it closest to?",
                        cue
                    ));
                }
                None
            }
            ContextField::OperatingConditions => {
                // A season-only remark relates to operating conditions but
                // does not pin down working hours.
                let season_hint = extracted.operating_conditions.is_none()
                    && extracted.entities.iter().any(|e| {
                        e.entity_type == EntityType::OperatingConditions
                            && e.confidence >= self.confidence_floor
                    });
                if season_hint {
                    let mention = extracted
                        .entities
                        .iter()
                        .find(|e| e.entity_type == EntityType::OperatingConditions)
                        .map(|e| e.value.clone())
                        .unwrap_or_else(|| "that".to_string());
                    return Some(format!(
                        "You mentioned the {}. What hours and days do you usually work?",
                        mention
                    ));
                }
                None
            }
            ContextField::BusinessType => None,
        }
    }

    /// Softer re-ask after a decline, same field.
    fn repeat_question(&self, field: ContextField, progress: &DialogueProgress) -> String {
        if progress.decline_streak(field) > 0 {
            format!(
                "No problem, even a rough idea helps. {}",
                self.question_for(field)
            )
        } else {
            self.question_for(field)
        }
    }

    /// The full targeted question for one missing field.
    fn question_for(&self, field: ContextField) -> String {
        match field {
            ContextField::BusinessType => {
                "What do you sell or what service do you offer?".to_string()
            }
            ContextField::Location => {
                "Where do you usually run your business?".to_string()
            }
            ContextField::OperatingConditions => {
                "What days and hours do you usually work?".to_string()
            }
        }
    }

    /// Confirmation prompt after a contradicted explicit field.
    fn confirmation_prompt(&self, field: ContextField, context: &SessionContext) -> String {
        let value = match field {
            ContextField::BusinessType => context
                .business_type()
                .map(|s| s.value.clone()),
            ContextField::Location => context.location().resolved().map(str::to_string),
            ContextField::OperatingConditions => context
                .operating_conditions()
                .map(|s| s.value.clone()),
        }
        .unwrap_or_else(|| "that".to_string());
        format!(
            "Earlier you told me something different about your {}. Should I go with {} now?",
            field.display_name(),
            value
        )
    }
}
