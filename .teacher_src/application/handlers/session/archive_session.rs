//! ArchiveSessionHandler - Command handler for archiving sessions.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventId, SerializableDomainEvent, SessionId, Timestamp, UserId,
};
use crate::domain::session::{Session, SessionArchived, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

/// Command to archive a session.
#[derive(Debug, Clone)]
pub struct ArchiveSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Result of successful session archival.
#[derive(Debug, Clone)]
pub struct ArchiveSessionResult {
    pub session: Session,
    pub event: SessionArchived,
}

/// Handler for archiving sessions.
pub struct ArchiveSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ArchiveSessionHandler {
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
        cmd: ArchiveSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<ArchiveSessionResult, SessionError> {
        // 1. Load session
        let mut session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| SessionError::not_found(cmd.session_id))?;

        // 2. Authorize - user must be owner
        session.authorize(&cmd.user_id)?;

        // 3. Archive
        session.archive()?;

        // 4. Persist
        self.repository.update(&session).await?;

        // 5. Publish event
        let event = SessionArchived {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            user_id: cmd.user_id,
            archived_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(ArchiveSessionResult { session, event })
    }
}
