//! CompleteCycleHandler - Command handler for completing a cycle.
//!
//! Completing a cycle transitions its status from Active to Completed.
//! This marks the end of the decision-making process for this cycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, SerializableDomainEvent,
    Timestamp,
};
use crate::ports::{CycleRepository, EventPublisher};

/// Command to complete a cycle.
#[derive(Debug, Clone)]
pub struct CompleteCycleCommand {
    /// The cycle to complete.
    pub cycle_id: CycleId,
}

/// Result of successfully completing a cycle.
#[derive(Debug, Clone)]
pub struct CompleteCycleResult {
    /// The completed cycle.
    pub cycle: Cycle,
    /// The emitted event.
    pub event: CycleCompletedEvent,
}

/// Event published when a cycle is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleCompletedEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The completed cycle.
    pub cycle_id: CycleId,
    /// When the cycle was completed.
    pub completed_at: Timestamp,
}

domain_event!(
    CycleCompletedEvent,
    event_type = "cycle.completed",
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = completed_at,
    event_id = event_id
);

/// Error type for completing a cycle.
#[derive(Debug, Clone)]
pub enum CompleteCycleError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g., cycle not active).
    Domain(DomainError),
}

impl std::fmt::Display for CompleteCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CompleteCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompleteCycleError {}

impl From<DomainError> for CompleteCycleError {
    fn from(err: DomainError) -> Self {
        CompleteCycleError::Domain(err)
    }
}

/// Handler for completing cycles.
pub struct CompleteCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteCycleHandler {
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
        cmd: CompleteCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteCycleResult, CompleteCycleError> {
        // 1. Find the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(CompleteCycleError::CycleNotFound(cmd.cycle_id))?;

        // 2. Complete the cycle (domain logic handles validation)
        cycle.complete()?;

        // 3. Persist the updated cycle
        self.cycle_repository.update(&cycle).await?;

        // 4. Create and publish event
        let event = CycleCompletedEvent {
            event_id: EventId::new(),
            cycle_id: cmd.cycle_id,
            completed_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(CompleteCycleResult { cycle, event })
    }
}
