//! UpdateProfileFromDecision - Command handler for updating profile after decision completion.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{
    AnalysisResult, DecisionAnalysisData, ProfileAnalyzer, ProfileRepository,
};

/// Command to update profile based on completed decision.
#[derive(Debug, Clone)]
pub struct UpdateProfileFromDecisionCommand {
    pub user_id: UserId,
    pub analysis_data: DecisionAnalysisData,
}

/// Result of profile update from decision.
#[derive(Debug, Clone)]
pub struct UpdateProfileFromDecisionResult {
    pub analysis_result: AnalysisResult,
}

/// Handler for updating profiles from decision data.
pub struct UpdateProfileFromDecisionHandler {
    repository: Arc<dyn ProfileRepository>,
    analyzer: Arc<dyn ProfileAnalyzer>,
}

impl UpdateProfileFromDecisionHandler {
    pub fn new(
        repository: Arc<dyn ProfileRepository>,
        analyzer: Arc<dyn ProfileAnalyzer>,
    ) -> Self {
        Self {
            repository,
            analyzer,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateProfileFromDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateProfileFromDecisionResult, DomainError> {
        // 1. Load profile (must exist and have consent)
        let mut profile = self
            .repository
            .find_by_user(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Profile not found"))?;

        if !profile.consent().analysis_enabled {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Analysis consent not granted",
            ));
        }

        // 2. Analyze decision and update profile
        let result = self
            .analyzer
            .analyze_decision(&mut profile, &cmd.analysis_data)
            .await?;

        // 3. Save updated profile
        self.repository.update(&profile).await?;

        // TODO: Publish domain events when event infrastructure is ready

        Ok(UpdateProfileFromDecisionResult {
            analysis_result: result,
        })
    }
}
