//! UpdateComponentOutputHandler - Command handler for updating a component's output.
//!
//! Allows updating the output data for a component that is InProgress or NeedsRevision.
//! This is the main way AI conversations translate into structured component data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CommandMetadata, ComponentType, CycleId, DomainError, EventId,
    SerializableDomainEvent, Timestamp,
};
use crate::ports::{CycleRepository, EventPublisher};

/// Command to update a component's output.
#[derive(Debug, Clone)]
pub struct UpdateComponentOutputCommand {
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component type to update.
    pub component_type: ComponentType,
    /// The new output data as JSON.
    pub output: serde_json::Value,
}

/// Result of successful output update.
#[derive(Debug)]
pub struct UpdateComponentOutputResult {
    /// The emitted event.
    pub event: ComponentOutputUpdatedEvent,
}

/// Event published when a component's output is updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentOutputUpdatedEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component type that was updated.
    pub component_type: ComponentType,
    /// When the output was updated.
    pub updated_at: Timestamp,
}

domain_event!(
    ComponentOutputUpdatedEvent,
    event_type = "component.output_updated",
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = updated_at,
    event_id = event_id
);

/// Error type for updating component output.
#[derive(Debug, Clone)]
pub enum UpdateComponentOutputError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g., component not in valid state).
    Domain(DomainError),
}

impl std::fmt::Display for UpdateComponentOutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateComponentOutputError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            UpdateComponentOutputError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for UpdateComponentOutputError {}

impl From<DomainError> for UpdateComponentOutputError {
    fn from(err: DomainError) -> Self {
        UpdateComponentOutputError::Domain(err)
    }
}

/// Handler for updating component outputs.
pub struct UpdateComponentOutputHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateComponentOutputHandler {
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
        cmd: UpdateComponentOutputCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateComponentOutputResult, UpdateComponentOutputError> {
        // 1. Find the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(UpdateComponentOutputError::CycleNotFound(cmd.cycle_id))?;

        // 2. Update the component output (domain logic handles validation)
        cycle.update_component_output(cmd.component_type, cmd.output)?;

        // 3. Persist the updated cycle
        self.cycle_repository.update(&cycle).await?;

        // 4. Create and publish event
        let event = ComponentOutputUpdatedEvent {
            event_id: EventId::new(),
            cycle_id: cmd.cycle_id,
            component_type: cmd.component_type,
            updated_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(UpdateComponentOutputResult { event })
    }
}
