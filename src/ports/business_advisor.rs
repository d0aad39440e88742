//! Business Advisor port - external guidance generation.
//!
//! One capability interface: specialized backends (location analysis,
//! market data, general advice) are an implementation detail behind it;
//! the result tags which sub-domain contributed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::context::SessionContext;
use crate::domain::foundation::DomainError;

/// Which sub-domain produced the guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceKind {
    Location,
    Market,
    General,
}

/// Guidance returned by the external advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceResponse {
    /// Plain advisory text, suitable for speech synthesis.
    pub text: String,
    pub kind: GuidanceKind,
    pub confidence: f64,
}

impl GuidanceResponse {
    /// Creates a guidance response, clamping confidence into [0, 1].
    pub fn new(text: impl Into<String>, kind: GuidanceKind, confidence: f64) -> Self {
        Self {
            text: text.into(),
            kind,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// External guidance capability, invoked only when the dialogue policy
/// is in the ready state.
#[async_trait]
pub trait BusinessAdvisor: Send + Sync {
    /// Generates guidance from the merged context and current utterance.
    ///
    /// # Errors
    ///
    /// - `AdvisorError` on upstream failure; callers degrade rather than
    ///   surface this to the user
    async fn generate_guidance(
        &self,
        context: &SessionContext,
        utterance: &str,
    ) -> Result<GuidanceResponse, DomainError>;
}
