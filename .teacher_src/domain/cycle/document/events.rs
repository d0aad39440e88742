//! Decision document domain events.
//!
//! Events emitted during document lifecycle operations. These events track
//! document creation, updates, and synchronization for audit trails and
//! triggering side effects like filesystem operations.

use crate::domain::foundation::{ComponentType, CycleId, DecisionDocumentId, Timestamp, UserId};

use super::{DocumentVersion, SyncSource};

/// Events that can occur during document lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// A new decision document was created for a cycle.
    Created {
        document_id: DecisionDocumentId,
        cycle_id: CycleId,
        user_id: UserId,
        file_path: String,
        created_at: Timestamp,
    },

    /// A decision document was updated from component changes.
    UpdatedFromComponents {
        document_id: DecisionDocumentId,
        cycle_id: CycleId,
        version: DocumentVersion,
        content_checksum: String,
        updated_at: Timestamp,
    },

    /// A decision document was edited by a user.
    EditedByUser {
        document_id: DecisionDocumentId,
        cycle_id: CycleId,
        user_id: UserId,
        version: DocumentVersion,
        content_checksum: String,
        edited_at: Timestamp,
    },

    /// A decision document was updated by an AI agent.
    UpdatedByAgent {
        document_id: DecisionDocumentId,
        cycle_id: CycleId,
        version: DocumentVersion,
        content_checksum: String,
        updated_at: Timestamp,
    },

    /// A decision document was synced from filesystem changes.
    SyncedFromFile {
        document_id: DecisionDocumentId,
        cycle_id: CycleId,
        version: DocumentVersion,
        content_checksum: String,
        synced_at: Timestamp,
    },

    /// A branched document was created from a parent.
    Branched {
        document_id: DecisionDocumentId,
        parent_document_id: DecisionDocumentId,
        cycle_id: CycleId,
        user_id: UserId,
        branch_point: ComponentType,
        branch_label: String,
        created_at: Timestamp,
    },

    /// Document content parsing detected errors.
    ParseErrorsDetected {
        document_id: DecisionDocumentId,
        cycle_id: CycleId,
        error_count: usize,
        first_error_message: String,
        detected_at: Timestamp,
    },

    /// Document was written to filesystem.
    WrittenToFile {
        document_id: DecisionDocumentId,
        file_path: String,
        size_bytes: usize,
        written_at: Timestamp,
    },
}

impl DocumentEvent {
    /// Returns the document ID associated with this event.
    pub fn document_id(&self) -> DecisionDocumentId {
        match self {
            DocumentEvent::Created { document_id, .. } => *document_id,
            DocumentEvent::UpdatedFromComponents { document_id, .. } => *document_id,
            DocumentEvent::EditedByUser { document_id, .. } => *document_id,
            DocumentEvent::UpdatedByAgent { document_id, .. } => *document_id,
            DocumentEvent::SyncedFromFile { document_id, .. } => *document_id,
            DocumentEvent::Branched { document_id, .. } => *document_id,
            DocumentEvent::ParseErrorsDetected { document_id, .. } => *document_id,
            DocumentEvent::WrittenToFile { document_id, .. } => *document_id,
        }
    }

    /// Returns the cycle ID if this event is associated with a cycle.
    pub fn cycle_id(&self) -> Option<CycleId> {
        match self {
            DocumentEvent::Created { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::UpdatedFromComponents { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::EditedByUser { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::UpdatedByAgent { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::SyncedFromFile { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::Branched { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::ParseErrorsDetected { cycle_id, .. } => Some(*cycle_id),
            DocumentEvent::WrittenToFile { .. } => None,
        }
    }

    /// Returns the sync source that triggered this event.
    pub fn sync_source(&self) -> Option<SyncSource> {
        match self {
            DocumentEvent::Created { .. } => Some(SyncSource::Initial),
            DocumentEvent::UpdatedFromComponents { .. } => Some(SyncSource::ComponentUpdate),
            DocumentEvent::EditedByUser { .. } => Some(SyncSource::UserEdit),
            DocumentEvent::UpdatedByAgent { .. } => Some(SyncSource::ComponentUpdate),
            DocumentEvent::SyncedFromFile { .. } => Some(SyncSource::FileSync),
            DocumentEvent::Branched { .. } => Some(SyncSource::Initial),
            DocumentEvent::ParseErrorsDetected { .. } => None,
            DocumentEvent::WrittenToFile { .. } => None,
        }
    }

    /// Returns the event type name for logging and debugging.
    pub fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::Created { .. } => "DocumentCreated",
            DocumentEvent::UpdatedFromComponents { .. } => "DocumentUpdatedFromComponents",
            DocumentEvent::EditedByUser { .. } => "DocumentEditedByUser",
            DocumentEvent::UpdatedByAgent { .. } => "DocumentUpdatedByAgent",
            DocumentEvent::SyncedFromFile { .. } => "DocumentSyncedFromFile",
            DocumentEvent::Branched { .. } => "DocumentBranched",
            DocumentEvent::ParseErrorsDetected { .. } => "DocumentParseErrorsDetected",
            DocumentEvent::WrittenToFile { .. } => "DocumentWrittenToFile",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
