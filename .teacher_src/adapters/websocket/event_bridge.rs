//! Event bridge connecting domain events to WebSocket clients.
//!
//! Subscribes to dashboard-relevant domain events and broadcasts them
//! to connected clients in the appropriate session rooms.
//!
//! # Event Flow
//!
//! ```text
//! Domain Event Published
//!          │
//!          ▼
//! ┌────────────────────┐
//! │ WebSocketEventBridge│
//! │  receives event    │
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │  Transform to      │
//! │  DashboardUpdate   │
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │  Resolve session   │
//! │  from aggregate_id │
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │  Broadcast to all  │
//! │  clients in room   │
//! └────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope, SessionId};
use crate::ports::{EventHandler, EventSubscriber};

use super::messages::{DashboardUpdate, DashboardUpdateType};
use super::rooms::RoomManager;

/// Event types that are relevant for dashboard updates.
///
/// These are the domain events that connected clients should know about.
pub const DASHBOARD_EVENT_TYPES: &[&str] = &[
    "session.created",
    "session.renamed",
    "cycle.created",
    "cycle.branched",
    "component.started",
    "component.completed",
    "component.output_updated",
    "message.sent",
    "pugh_scores.computed",
    "dq_scores.computed",
    "cycle.completed",
];

/// Bridge between the event bus and WebSocket connections.
///
/// Implements `EventHandler` to receive domain events and broadcast
/// them to connected clients in the appropriate session rooms.
pub struct WebSocketEventBridge {
    room_manager: Arc<RoomManager>,
}

impl WebSocketEventBridge {
    /// Create a new event bridge with the given room manager.
    pub fn new(room_manager: Arc<RoomManager>) -> Self {
        Self { room_manager }
    }

    /// Create as an Arc (for sharing with event subscriber).
    pub fn new_shared(room_manager: Arc<RoomManager>) -> Arc<Self> {
        Arc::new(Self::new(room_manager))
    }

    /// Register this bridge with an event subscriber.
    ///
    /// Subscribes to all dashboard-relevant event types.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let bridge = WebSocketEventBridge::new_shared(room_manager);
    /// bridge.register(&event_bus);
    /// ```
    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(DASHBOARD_EVENT_TYPES, self.clone());
    }

    /// Transform a domain event envelope into a dashboard update.
    ///
    /// Returns `None` if the event type is not relevant for dashboard updates.
    fn transform(&self, event: &EventEnvelope) -> Option<DashboardUpdate> {
        let update_type = match event.event_type.as_str() {
            "session.created" | "session.renamed" => DashboardUpdateType::SessionMetadata,
            "cycle.created" | "cycle.branched" => DashboardUpdateType::CycleCreated,
            "component.started" => DashboardUpdateType::ComponentStarted,
            "component.completed" => DashboardUpdateType::ComponentCompleted,
            "component.output_updated" => DashboardUpdateType::ComponentOutput,
            "message.sent" => DashboardUpdateType::ConversationMessage,
            "pugh_scores.computed" | "dq_scores.computed" => DashboardUpdateType::AnalysisScores,
            "cycle.completed" => DashboardUpdateType::CycleCompleted,
            _ => return None,
        };

        Some(DashboardUpdate {
            update_type,
            data: event.payload.clone(),
            timestamp: event.occurred_at,
            correlation_id: event.metadata.correlation_id.clone(),
        })
    }

    /// Resolve the session ID from an event envelope.
    ///
    /// For session events, uses the aggregate_id directly.
    /// For cycle/component events, extracts session_id from the payload.
    fn resolve_session_id(&self, event: &EventEnvelope) -> Option<SessionId> {
        // Session events have session_id as the aggregate_id
        if event.aggregate_type == "Session" {
            return event.aggregate_id.parse().ok();
        }

        // Cycle and component events should include session_id in payload
        if event.aggregate_type == "Cycle" || event.aggregate_type == "Component" {
            if let Some(session_id) = event.payload.get("session_id") {
                return session_id.as_str().and_then(|s| s.parse().ok());
            }
        }

        // Conversation events may also include session_id
        if let Some(session_id) = event.payload.get("session_id") {
            return session_id.as_str().and_then(|s| s.parse().ok());
        }

        None
    }
}

#[async_trait]
impl EventHandler for WebSocketEventBridge {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        // Transform to dashboard update
        let Some(update) = self.transform(&event) else {
            return Ok(()); // Event not relevant for dashboard
        };

        // Resolve session for room routing
        let Some(session_id) = self.resolve_session_id(&event) else {
            tracing::debug!(
                event_type = %event.event_type,
                aggregate_type = %event.aggregate_type,
                aggregate_id = %event.aggregate_id,
                "Cannot resolve session ID for event, skipping WebSocket broadcast"
            );
            return Ok(()); // Can't route without session
        };

        // Broadcast to session room
        self.room_manager
            .broadcast_to_session(&session_id, update)
            .await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "WebSocketEventBridge"
    }
}
