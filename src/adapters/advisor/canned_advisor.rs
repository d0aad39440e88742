//! Canned Business Advisor - deterministic guidance for dev and tests.
//!
//! Produces plausible template guidance from the merged context without
//! any network access. Used by the dev harness when no advisor API key
//! is configured, and by tests that need a predictable advisor.

use async_trait::async_trait;

use crate::domain::context::SessionContext;
use crate::domain::foundation::DomainError;
use crate::ports::{BusinessAdvisor, GuidanceKind, GuidanceResponse};

/// Template-based advisor with no external dependencies.
#[derive(Debug, Clone, Default)]
pub struct CannedAdvisor;

impl CannedAdvisor {
    /// Creates a new canned advisor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BusinessAdvisor for CannedAdvisor {
    async fn generate_guidance(
        &self,
        context: &SessionContext,
        _utterance: &str,
    ) -> Result<GuidanceResponse, DomainError> {
        let business = context
            .business_type()
            .map(|s| s.value.clone())
            .unwrap_or_else(|| "your goods".to_string());

        let (text, kind) = match context.location().resolved() {
            Some(location) => (
                format!(
                    "Selling {} around {} works best when you match the foot traffic. \
                     Watch which hours bring the most passers-by and keep your best \
                     stock visible then.",
                    business, location
                ),
                GuidanceKind::Location,
            ),
            None => (
                format!(
                    "For {}, steady customers matter more than busy days. Keep your \
                     prices consistent and greet repeat buyers by name.",
                    business
                ),
                GuidanceKind::General,
            ),
        };

        Ok(GuidanceResponse::new(text, kind, 0.6))
    }
}
