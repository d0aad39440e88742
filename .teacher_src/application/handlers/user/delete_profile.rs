//! DeleteProfile - Command handler for deleting decision profiles.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, UserId};
use crate::domain::user::DecisionProfileId;
use crate::ports::ProfileRepository;

/// Command to delete a decision profile.
#[derive(Debug, Clone)]
pub struct DeleteProfileCommand {
    pub user_id: UserId,
    pub confirmation: String,
}

/// Required confirmation string for deletion.
const CONFIRMATION_STRING: &str = "DELETE MY PROFILE";

/// Result of profile deletion.
#[derive(Debug, Clone)]
pub struct DeleteProfileResult {
    pub deleted_profile_id: DecisionProfileId,
}

/// Handler for deleting profiles.
pub struct DeleteProfileHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl DeleteProfileHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeleteProfileCommand,
        _metadata: CommandMetadata,
    ) -> Result<DeleteProfileResult, DomainError> {
        // 1. Verify confirmation string
        if cmd.confirmation != CONFIRMATION_STRING {
            return Err(DomainError::validation(
                "confirmation",
                &format!(
                    "Confirmation string must be exactly '{}'",
                    CONFIRMATION_STRING
                ),
            ));
        }

        // 2. Load profile to get ID
        let profile = self
            .repository
            .find_by_user(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Profile not found"))?;

        let profile_id = profile.id();

        // 3. Delete profile (cascades to history via foreign key)
        self.repository.delete(profile_id).await?;

        // TODO: Publish domain events when event infrastructure is ready

        Ok(DeleteProfileResult {
            deleted_profile_id: profile_id,
        })
    }
}
