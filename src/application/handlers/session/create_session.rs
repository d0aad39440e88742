//! CreateSessionHandler - command handler for starting a conversation.

use std::sync::Arc;

use tracing::info;

use crate::application::device::DeviceIdentity;
use crate::domain::context::{ContextMerger, SessionContext, UserProfile};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ContextStore;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub user_id: UserId,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub context: SessionContext,
    /// True when explicit facts were carried over from a previous
    /// closed session.
    pub seeded: bool,
}

/// Handler for creating sessions.
///
/// Mints a globally unique session id from the device identity, seeds
/// the new context from the user's most recent closed session (explicit
/// fields only), and records the session start on the user profile.
pub struct CreateSessionHandler {
    store: Arc<dyn ContextStore>,
    device: Arc<DeviceIdentity>,
    merger: ContextMerger,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn ContextStore>, device: Arc<DeviceIdentity>) -> Self {
        Self {
            store,
            device,
            merger: ContextMerger::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResult, DomainError> {
        let session_id = self.device.mint_session_id();
        let mut context = SessionContext::new(session_id, cmd.user_id.clone());

        let previous = self.store.latest_closed_session(&cmd.user_id).await?;
        let seeded = match &previous {
            Some(previous) => {
                self.merger.seed_session(&mut context, previous);
                true
            }
            None => false,
        };

        self.store.create_session(&context).await?;

        let mut profile = self
            .store
            .get_user_profile(&cmd.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(cmd.user_id.clone()));
        profile.record_session_started();
        self.store.put_user_profile(&profile).await?;

        info!(
            target: "sahayak::session",
            session_id = %context.session_id(),
            user_id = %cmd.user_id,
            seeded,
            "session created"
        );
        Ok(CreateSessionResult { context, seeded })
    }
}
