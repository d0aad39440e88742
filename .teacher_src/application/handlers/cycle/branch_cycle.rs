//! BranchCycleHandler - Command handler for creating cycle branches.
//!
//! Branching allows users to explore "what-if" scenarios without losing
//! their existing work. A branch copies completed components up to the
//! branch point, marks the branch point for revision, and starts fresh
//! for components after the branch point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, ComponentType, CycleId, DomainError, EventId,
    SerializableDomainEvent, SessionId, Timestamp,
};
use crate::ports::{AccessChecker, AccessResult, CycleRepository, EventPublisher};

/// Command to branch an existing cycle at a specific component.
#[derive(Debug, Clone)]
pub struct BranchCycleCommand {
    /// The cycle to branch from.
    pub parent_cycle_id: CycleId,
    /// The component where branching occurs.
    /// This component will be marked for revision in the new branch.
    pub branch_point: ComponentType,
    /// Optional label for the branch (e.g., "Remote Option", "Risk Analysis").
    pub branch_label: Option<String>,
}

/// Result of successful cycle branching.
#[derive(Debug, Clone)]
pub struct BranchCycleResult {
    /// The newly created branch cycle.
    pub branch: Cycle,
    /// The emitted event.
    pub event: CycleBranchedEvent,
}

/// Event published when a cycle is branched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleBranchedEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The new branch cycle that was created.
    pub cycle_id: CycleId,
    /// The parent cycle that was branched from.
    pub parent_cycle_id: CycleId,
    /// The session this cycle belongs to.
    pub session_id: SessionId,
    /// The component where branching occurred.
    pub branch_point: ComponentType,
    /// When the branch was created.
    pub created_at: Timestamp,
}

domain_event!(
    CycleBranchedEvent,
    event_type = "cycle.branched",
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = created_at,
    event_id = event_id
);

/// Error type for cycle branching.
#[derive(Debug, Clone)]
pub enum BranchCycleError {
    /// Parent cycle not found.
    CycleNotFound(CycleId),
    /// Access denied by membership check.
    AccessDenied(crate::ports::AccessDeniedReason),
    /// Domain error (e.g., invalid branch point).
    Domain(DomainError),
}

impl std::fmt::Display for BranchCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            BranchCycleError::AccessDenied(reason) => {
                write!(f, "Access denied: {:?}", reason)
            }
            BranchCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for BranchCycleError {}

impl From<DomainError> for BranchCycleError {
    fn from(err: DomainError) -> Self {
        BranchCycleError::Domain(err)
    }
}

/// Handler for branching cycles.
pub struct BranchCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    access_checker: Arc<dyn AccessChecker>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl BranchCycleHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        access_checker: Arc<dyn AccessChecker>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_repository,
            access_checker,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: BranchCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<BranchCycleResult, BranchCycleError> {
        // 1. Find the parent cycle
        let parent_cycle = self
            .cycle_repository
            .find_by_id(&cmd.parent_cycle_id)
            .await?
            .ok_or(BranchCycleError::CycleNotFound(cmd.parent_cycle_id))?;

        // 2. Check access (membership-based limits)
        match self
            .access_checker
            .can_create_cycle(&metadata.user_id, &parent_cycle.session_id())
            .await?
        {
            AccessResult::Allowed => {}
            AccessResult::Denied(reason) => {
                return Err(BranchCycleError::AccessDenied(reason));
            }
        }

        // 3. Branch the cycle (domain logic handles validation)
        let branch = parent_cycle.branch_at(cmd.branch_point, cmd.branch_label)?;

        // 4. Persist the new branch
        self.cycle_repository.save(&branch).await?;

        // 5. Create and publish event
        let event = CycleBranchedEvent {
            event_id: EventId::new(),
            cycle_id: branch.id(),
            parent_cycle_id: cmd.parent_cycle_id,
            session_id: parent_cycle.session_id(),
            branch_point: cmd.branch_point,
            created_at: branch.created_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(BranchCycleResult { branch, event })
    }
}
