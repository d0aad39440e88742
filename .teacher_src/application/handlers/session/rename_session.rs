//! RenameSessionHandler - Command handler for renaming sessions.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, SerializableDomainEvent, SessionId, Timestamp, UserId,
};
use crate::domain::session::{Session, SessionError, SessionRenamed};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to rename a session.
#[derive(Debug, Clone)]
pub struct RenameSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub new_title: String,
}

/// Result of successful session rename.
#[derive(Debug, Clone)]
pub struct RenameSessionResult {
    pub session: Session,
    pub event: SessionRenamed,
}

/// Handler for renaming sessions.
pub struct RenameSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RenameSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RenameSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<RenameSessionResult, SessionError> {
        // 1. Load session
        let mut session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| SessionError::not_found(cmd.session_id))?;

        // 2. Authorize - user must be owner
        session.authorize(&cmd.user_id)?;

        // 3. Capture old title for event
        let old_title = session.title().to_string();

        // 4. Apply rename
        session.rename(cmd.new_title.clone())?;

        // 5. Persist
        self.repository.update(&session).await?;

        // 6. Publish event
        let event = SessionRenamed {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            user_id: cmd.user_id,
            old_title,
            new_title: cmd.new_title,
            renamed_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(RenameSessionResult { session, event })
    }
}
