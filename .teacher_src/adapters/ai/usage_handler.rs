//! AIUsageHandler - Event handler for tracking AI token usage.
//!
//! Subscribes to `ai.tokens_used` events and records usage via the UsageTracker port.
//! This enables cost tracking, limit enforcement, and usage analytics.

use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::ai::ai_events::AITokensUsed;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, UsageTracker};

/// Event handler that records AI token usage for cost tracking.
///
/// # Example
///
/// ```ignore
/// let tracker: Arc<dyn UsageTracker> = /* ... */;
/// let handler = AIUsageHandler::new(tracker);
///
/// // Subscribe to AI token events
/// event_bus.subscribe("ai.tokens_used", Arc::new(handler));
/// ```
pub struct AIUsageHandler {
    // Note: tracker is used in commented code awaiting AITokensUsed event enhancement
    #[allow(dead_code)]
    tracker: Arc<dyn UsageTracker>,
}

impl AIUsageHandler {
    /// Creates a new handler with the given usage tracker.
    pub fn new(tracker: Arc<dyn UsageTracker>) -> Self {
        Self { tracker }
    }

    /// Handles a tokens used event.
    async fn handle_tokens_used(&self, event: AITokensUsed) -> Result<(), DomainError> {
        // Note: The current AITokensUsed event doesn't include user_id/session_id.
        // This handler demonstrates the pattern, but requires the event to be
        // enhanced with user context for full cost attribution.
        //
        // For now, we skip recording until the event is enhanced.
        // In a production system, you'd either:
        // 1. Enhance the event with user context (preferred)
        // 2. Use a correlation store to map request_id -> user context
        // 3. Extract user context from the event envelope metadata

        // Log for debugging (replace with tracing when available)
        #[cfg(debug_assertions)]
        eprintln!(
            "AI tokens used: provider={}, model={}, prompt_tokens={}, completion_tokens={}, cost_cents={}, request_id={}",
            event.provider,
            event.model,
            event.prompt_tokens,
            event.completion_tokens,
            event.estimated_cost_cents,
            event.request_id
        );

        // Suppress unused variable warning in release builds
        let _ = &event;

        // TODO: Uncomment when AITokensUsed includes user_id and session_id
        // let record = UsageRecord::new(
        //     event.user_id,
        //     event.session_id,
        //     &event.provider,
        //     &event.model,
        //     event.prompt_tokens,
        //     event.completion_tokens,
        //     event.estimated_cost_cents,
        //     event.component_type,
        // );
        //
        // self.tracker
        //     .record_usage(record)
        //     .await
        //     .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl EventHandler for AIUsageHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if event.event_type != "ai.tokens_used" {
            return Ok(());
        }

        let tokens_used: AITokensUsed = event.payload_as().map_err(|e| {
            DomainError::new(
                ErrorCode::InvalidFormat,
                format!("Failed to deserialize AITokensUsed event: {}", e),
            )
        })?;

        self.handle_tokens_used(tokens_used).await
    }

    fn name(&self) -> &'static str {
        "AIUsageHandler"
    }
}
