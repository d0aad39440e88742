//! CompleteComponentHandler - Command handler for completing a component.
//!
//! Completing a component transitions it from InProgress to Complete.
//! The component must be in the InProgress state to be completed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, ComponentType, CycleId, DomainError, EventId,
    SerializableDomainEvent, Timestamp,
};
use crate::ports::{CycleRepository, EventPublisher};

/// Command to complete a component within a cycle.
#[derive(Debug, Clone)]
pub struct CompleteComponentCommand {
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component type to complete.
    pub component_type: ComponentType,
}

/// Result of successfully completing a component.
#[derive(Debug, Clone)]
pub struct CompleteComponentResult {
    /// The updated cycle.
    pub cycle: Cycle,
    /// The emitted event.
    pub event: ComponentCompletedEvent,
}

/// Event published when a component is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCompletedEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component that was completed.
    pub component_type: ComponentType,
    /// When the component was completed.
    pub completed_at: Timestamp,
}

domain_event!(
    ComponentCompletedEvent,
    event_type = "component.completed.v1",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = completed_at,
    event_id = event_id
);

/// Error type for completing a component.
#[derive(Debug, Clone)]
pub enum CompleteComponentError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g., component not in progress).
    Domain(DomainError),
}

impl std::fmt::Display for CompleteComponentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteComponentError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CompleteComponentError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompleteComponentError {}

impl From<DomainError> for CompleteComponentError {
    fn from(err: DomainError) -> Self {
        CompleteComponentError::Domain(err)
    }
}

/// Handler for completing components.
pub struct CompleteComponentHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteComponentHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteComponentCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteComponentResult, CompleteComponentError> {
        // 1. Find the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(CompleteComponentError::CycleNotFound(cmd.cycle_id))?;

        // 2. Complete the component (domain logic handles validation)
        cycle.complete_component(cmd.component_type)?;

        // 3. Persist the updated cycle
        self.cycle_repository.update(&cycle).await?;

        // 4. Create and publish event
        let event = ComponentCompletedEvent {
            event_id: EventId::new(),
            cycle_id: cmd.cycle_id,
            component_type: cmd.component_type,
            completed_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(CompleteComponentResult { cycle, event })
    }
}
