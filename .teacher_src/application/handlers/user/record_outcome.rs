//! RecordOutcome - Command handler for recording decision outcomes.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, ErrorCode, UserId};
use crate::domain::user::{OutcomeRecord, SatisfactionLevel};
use crate::ports::ProfileRepository;

/// Command to record a decision outcome.
#[derive(Debug, Clone)]
pub struct RecordOutcomeCommand {
    pub user_id: UserId,
    pub cycle_id: CycleId,
    pub satisfaction: SatisfactionLevel,
    pub actual_consequences: String,
    pub surprises: Vec<String>,
    pub would_decide_same: bool,
}

/// Result of recording outcome.
#[derive(Debug, Clone)]
pub struct RecordOutcomeResult {
    pub success: bool,
}

/// Handler for recording decision outcomes.
pub struct RecordOutcomeHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl RecordOutcomeHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: RecordOutcomeCommand,
        _metadata: CommandMetadata,
    ) -> Result<RecordOutcomeResult, DomainError> {
        // 1. Load profile
        let mut profile = self
            .repository
            .find_by_user(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Profile not found"))?;

        // 2. Create outcome record
        let outcome = OutcomeRecord::new(
            cmd.satisfaction,
            cmd.actual_consequences.clone(),
            cmd.surprises.clone(),
            cmd.would_decide_same,
        )?;

        // 3. Record outcome in history
        profile.record_outcome(&cmd.cycle_id, outcome)?;

        // 4. Save updated profile
        self.repository.update(&profile).await?;

        // TODO: Publish domain events when event infrastructure is ready

        Ok(RecordOutcomeResult { success: true })
    }
}
