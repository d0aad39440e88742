//! CancelMembershipHandler - Command handler for cancelling memberships.

use std::sync::Arc;

use crate::domain::foundation::{EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::membership::{Membership, MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MembershipRepository};

/// Command to cancel a membership.
#[derive(Debug, Clone)]
pub struct CancelMembershipCommand {
    pub user_id: UserId,
}

/// Result of successful membership cancellation.
#[derive(Debug, Clone)]
pub struct CancelMembershipResult {
    pub membership: Membership,
    pub event: MembershipEvent,
    /// When access will end (period_end).
    pub effective_at: Timestamp,
}

/// Handler for cancelling memberships.
///
/// Cancellation takes effect at the end of the current billing period.
/// Users retain access until then.
pub struct CancelMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelMembershipHandler {
    pub fn new(
        repository: Arc<dyn MembershipRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelMembershipCommand,
    ) -> Result<CancelMembershipResult, MembershipError> {
        // 1. Find the user's membership
        let mut membership = self
            .repository
            .find_by_user_id(&cmd.user_id)
            .await?
            .ok_or_else(|| MembershipError::not_found_for_user(cmd.user_id.clone()))?;

        let effective_at = membership.current_period_end;

        // 2. Cancel the membership (domain logic)
        membership.cancel().map_err(|e| {
            MembershipError::invalid_state(
                format!("{:?}", membership.status),
                e.to_string(),
            )
        })?;

        // 3. Persist the update
        self.repository.update(&membership).await?;

        // 4. Create and publish event
        let event = MembershipEvent::Cancelled {
            event_id: EventId::new(),
            membership_id: membership.id,
            user_id: cmd.user_id,
            effective_at,
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        self.event_publisher.publish(envelope).await?;

        Ok(CancelMembershipResult {
            membership,
            event,
            effective_at,
        })
    }
}
