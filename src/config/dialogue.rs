//! Dialogue policy and session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Dialogue configuration (question policy and session timeout)
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Minutes of inactivity before the sweep closes a session
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: i64,

    /// How often the timeout sweep runs, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Consecutive declines before a field is accepted as unset
    #[serde(default = "default_decline_budget")]
    pub decline_budget: u8,

    /// Confidence floor separating facts from hints
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Transcripts below this confidence trigger a re-prompt
    #[serde(default = "default_transcript_floor")]
    pub transcript_floor: f64,
}

impl DialogueConfig {
    /// Get the sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_timeout_minutes < 1 {
            return Err(ValidationError::InvalidSessionTimeout);
        }
        if self.decline_budget == 0 {
            return Err(ValidationError::InvalidDeclineBudget);
        }
        if !(0.0..=1.0).contains(&self.confidence_floor)
            || !(0.0..=1.0).contains(&self.transcript_floor)
        {
            return Err(ValidationError::InvalidConfidenceFloor);
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: default_session_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            decline_budget: default_decline_budget(),
            confidence_floor: default_confidence_floor(),
            transcript_floor: default_transcript_floor(),
        }
    }
}

fn default_session_timeout() -> i64 {
    30
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_decline_budget() -> u8 {
    2
}

fn default_confidence_floor() -> f64 {
    0.5
}

fn default_transcript_floor() -> f64 {
    0.7
}
