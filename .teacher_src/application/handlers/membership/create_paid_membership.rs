//! CreatePaidMembershipHandler - Command handler for initiating paid membership checkout.

use std::sync::Arc;

use crate::domain::foundation::{EventId, MembershipId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::membership::{Membership, MembershipError, MembershipEvent, MembershipTier};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, EventPublisher,
    MembershipRepository, PaymentProvider,
};

/// Command to initiate a paid membership checkout.
#[derive(Debug, Clone)]
pub struct CreatePaidMembershipCommand {
    pub user_id: UserId,
    pub email: String,
    pub tier: MembershipTier,
    pub success_url: String,
    pub cancel_url: String,
    pub promo_code: Option<String>,
}

/// Result of successful checkout initiation.
#[derive(Debug, Clone)]
pub struct CreatePaidMembershipResult {
    pub membership: Membership,
    pub checkout_session: CheckoutSession,
    pub event: MembershipEvent,
}

/// Handler for initiating paid membership checkout.
///
/// This creates a pending membership and redirects the user to the payment provider's
/// checkout page. The membership is activated when the webhook confirms payment.
pub struct CreatePaidMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreatePaidMembershipHandler {
    pub fn new(
        repository: Arc<dyn MembershipRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            payment_provider,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaidMembershipCommand,
    ) -> Result<CreatePaidMembershipResult, MembershipError> {
        // 1. Check if user already has a membership
        if let Some(_existing) = self.repository.find_by_user_id(&cmd.user_id).await? {
            return Err(MembershipError::already_exists(cmd.user_id));
        }

        // 2. Validate tier is paid
        if cmd.tier == MembershipTier::Free {
            return Err(MembershipError::invalid_tier(
                "Cannot use checkout for free tier. Use promo code instead.",
            ));
        }

        // 3. Create or get customer in payment provider
        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                user_id: cmd.user_id.clone(),
                email: cmd.email.clone(),
                name: None,
                idempotency_key: Some(format!("customer-{}", cmd.user_id)),
            })
            .await
            .map_err(|e| MembershipError::payment_failed(e.message))?;

        // 4. Create pending membership
        let membership_id = MembershipId::new();
        let membership = Membership::create_paid(
            membership_id,
            cmd.user_id.clone(),
            cmd.tier,
            customer.id.clone(),
        );

        // 5. Persist pending membership
        self.repository.save(&membership).await?;

        // 6. Create checkout session
        let checkout_session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                user_id: cmd.user_id.clone(),
                email: cmd.email,
                tier: cmd.tier,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
                promo_code: cmd.promo_code.clone(),
            })
            .await
            .map_err(|e| MembershipError::payment_failed(e.message))?;

        // 7. Create and publish event
        let event = MembershipEvent::Created {
            event_id: EventId::new(),
            membership_id,
            user_id: cmd.user_id,
            tier: cmd.tier,
            is_free: false,
            promo_code: cmd.promo_code,
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        self.event_publisher.publish(envelope).await?;

        Ok(CreatePaidMembershipResult {
            membership,
            checkout_session,
            event,
        })
    }
}
