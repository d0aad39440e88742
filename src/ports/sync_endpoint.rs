//! Remote sync endpoint port.
//!
//! The endpoint is assumed to deduplicate uploads by item id, which
//! makes re-uploading an already-applied item a no-op and sync safely
//! resumable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::context::{SyncCursor, UserProfile};
use crate::domain::extraction::ExtractedContext;
use crate::domain::foundation::{DeviceTag, DomainError, ItemId, UserId};
use crate::domain::sync::QueuedItem;

/// Server verdict for one uploaded batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub accepted: Vec<ItemId>,
    pub rejected: Vec<ItemId>,
    /// Assigned on the device's first successful upload; folded into
    /// session ids minted afterwards.
    pub assigned_device_tag: Option<DeviceTag>,
}

/// Server-side updates to fold into local state.
///
/// Updates carry the same `ExtractedContext` shape the live pipeline
/// produces, so the one Context Merger code path applies both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteUpdates {
    pub updates: Vec<ExtractedContext>,
    pub profile: Option<UserProfile>,
    /// Opaque watermark to persist once everything above is applied.
    pub next_cursor: String,
}

/// Upload/download boundary to the sync service.
#[async_trait]
pub trait SyncEndpoint: Send + Sync {
    /// Uploads a batch of queued items.
    ///
    /// # Errors
    ///
    /// - `Unreachable` when the endpoint cannot be reached (transport)
    /// - `SyncFailed` on protocol-level failure
    async fn upload(&self, batch: &[QueuedItem]) -> Result<UploadReceipt, DomainError>;

    /// Downloads updates produced since the given cursor.
    ///
    /// # Errors
    ///
    /// - `Unreachable` when the endpoint cannot be reached (transport)
    /// - `SyncFailed` on protocol-level failure
    async fn download_updates(
        &self,
        user_id: &UserId,
        since: Option<&SyncCursor>,
    ) -> Result<RemoteUpdates, DomainError>;
}
