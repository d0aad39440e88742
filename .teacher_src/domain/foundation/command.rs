//! Command infrastructure for CQRS handlers.
//!
//! This module provides the standard types for command handlers:
//! - `CommandMetadata` - Context that flows through command processing
//!
//! # DRY Pattern
//!
//! Instead of each handler accepting `correlation_id: Option<String>,
//! user_id: String, trace_id: Option<String>`, they accept a single
//! `CommandMetadata` struct. This:
//! - Reduces function parameter count
//! - Ensures consistent naming across all handlers
//! - Makes it easy to add new metadata fields without changing signatures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
///
/// Carries tracing, correlation, and authentication context through
/// the command processing pipeline. This should be passed to all
/// command handlers and propagated to emitted events.
///
/// # Example
///
/// ```ignore
/// pub struct CreateSessionHandler {
///     repo: Arc<dyn SessionRepository>,
///     publisher: Arc<dyn EventPublisher>,
/// }
///
/// impl CreateSessionHandler {
///     pub async fn handle(
///         &self,
///         cmd: CreateSessionCommand,
///         metadata: CommandMetadata,
///     ) -> Result<SessionId, DomainError> {
///         // ... handler logic
///
///         // Propagate metadata to events
///         let envelope = EventEnvelope::from_event(&event)
///             .with_correlation_id(metadata.correlation_id())
///             .with_user_id(metadata.user_id.to_string());
///
///         self.publisher.publish(envelope).await?;
///         Ok(session.id)
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command (required for authorization).
    pub user_id: UserId,

    /// Links related operations across a single user request.
    /// Generated at API boundary if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Distributed tracing span/trace ID.
    /// Propagated from incoming requests (e.g., from OpenTelemetry).
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,

    /// Source of this command (e.g., "api", "websocket", "scheduler").
    /// Useful for audit logs and debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata with required user ID.
    ///
    /// Generates a correlation ID automatically if not provided later.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
            trace_id: None,
            source: None,
        }
    }

    /// Creates metadata with all optional fields populated.
    ///
    /// Use this when reconstructing from serialized form or tests.
    pub fn with_all(
        user_id: UserId,
        correlation_id: Option<String>,
        trace_id: Option<String>,
        source: Option<String>,
    ) -> Self {
        Self {
            user_id,
            correlation_id,
            trace_id,
            source,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add trace ID for distributed tracing.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    ///
    /// This ensures every command has a correlation ID for tracing,
    /// even if the API layer didn't provide one.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the correlation ID only if explicitly set.
    pub fn correlation_id_opt(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns the trace ID if set.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture with a test user ID.
    ///
    /// Only available in test builds.
    pub fn test_fixture() -> Self {
        Self::new(UserId::new("test-user-123").unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
