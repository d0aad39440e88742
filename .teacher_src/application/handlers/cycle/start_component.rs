//! StartComponentHandler - Command handler for starting a component in a cycle.
//!
//! Starting a component transitions it from NotStarted to InProgress and
//! updates the cycle's current step. Components must be started in order
//! (previous component must be at least started).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, ComponentType, CycleId, DomainError, EventId,
    SerializableDomainEvent, Timestamp,
};
use crate::ports::{CycleRepository, EventPublisher};

/// Command to start a component within a cycle.
#[derive(Debug, Clone)]
pub struct StartComponentCommand {
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component type to start.
    pub component_type: ComponentType,
}

/// Result of successfully starting a component.
#[derive(Debug, Clone)]
pub struct StartComponentResult {
    /// The updated cycle.
    pub cycle: Cycle,
    /// The emitted event.
    pub event: ComponentStartedEvent,
}

/// Event published when a component is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStartedEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component that was started.
    pub component_type: ComponentType,
    /// When the component was started.
    pub started_at: Timestamp,
}

domain_event!(
    ComponentStartedEvent,
    event_type = "component.started.v1",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = started_at,
    event_id = event_id
);

/// Error type for starting a component.
#[derive(Debug, Clone)]
pub enum StartComponentError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g., invalid order, already started).
    Domain(DomainError),
}

impl std::fmt::Display for StartComponentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartComponentError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            StartComponentError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StartComponentError {}

impl From<DomainError> for StartComponentError {
    fn from(err: DomainError) -> Self {
        StartComponentError::Domain(err)
    }
}

/// Handler for starting components.
pub struct StartComponentHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl StartComponentHandler {
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
        cmd: StartComponentCommand,
        metadata: CommandMetadata,
    ) -> Result<StartComponentResult, StartComponentError> {
        // 1. Find the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(StartComponentError::CycleNotFound(cmd.cycle_id))?;

        // 2. Start the component (domain logic handles validation)
        cycle.start_component(cmd.component_type)?;

        // 3. Persist the updated cycle
        self.cycle_repository.update(&cycle).await?;

        // 4. Create and publish event
        let event = ComponentStartedEvent {
            event_id: EventId::new(),
            cycle_id: cmd.cycle_id,
            component_type: cmd.component_type,
            started_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(StartComponentResult { cycle, event })
    }
}
