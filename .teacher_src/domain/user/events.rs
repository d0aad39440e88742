//! Domain events for the Decision Profile feature

use crate::domain::foundation::{CycleId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::{
    BlindSpot, DecisionProfileId, GrowthObservation, OutcomeRecord, ProfileConsent,
    RiskClassification,
};

/// Domain events for Decision Profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileEvent {
    /// Profile was created with user consent
    DecisionProfileCreated {
        user_id: UserId,
        profile_id: DecisionProfileId,
        consent: ProfileConsent,
        created_at: Timestamp,
    },

    /// Profile was updated after analyzing a decision
    DecisionProfileUpdated {
        profile_id: DecisionProfileId,
        version: u32,
        decisions_analyzed: u32,
        updated_at: Timestamp,
    },

    /// Risk profile classification changed
    RiskProfileRecalculated {
        profile_id: DecisionProfileId,
        old_classification: RiskClassification,
        new_classification: RiskClassification,
        confidence: f32,
        recalculated_at: Timestamp,
    },

    /// New blind spot identified
    BlindSpotIdentified {
        profile_id: DecisionProfileId,
        blind_spot: BlindSpot,
        identified_at: Timestamp,
    },

    /// Growth observed in a particular area
    GrowthObserved {
        profile_id: DecisionProfileId,
        growth: GrowthObservation,
        observed_at: Timestamp,
    },

    /// Outcome recorded for a past decision
    OutcomeRecorded {
        profile_id: DecisionProfileId,
        cycle_id: CycleId,
        outcome: OutcomeRecord,
        recorded_at: Timestamp,
    },

    /// Consent settings updated
    ConsentUpdated {
        profile_id: DecisionProfileId,
        consent: ProfileConsent,
        updated_at: Timestamp,
    },

    /// Profile deleted by user request
    ProfileDeleted {
        user_id: UserId,
        profile_id: DecisionProfileId,
        deleted_at: Timestamp,
    },

    /// Profile exported
    ProfileExported {
        profile_id: DecisionProfileId,
        format: ExportFormat,
        exported_at: Timestamp,
    },
}

/// Export format for profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Markdown,
    Json,
    Pdf,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}
