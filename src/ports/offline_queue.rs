//! Offline Queue port - durable write-ahead log of pending user actions.
//!
//! # Design
//!
//! - **Exclusive ownership**: an item belongs to the queue until it is
//!   acknowledged (removed) or dead-lettered (held for inspection)
//! - **Per-session FIFO**: `dequeue_batch` returns items oldest-first,
//!   which preserves per-session timestamp order across the
//!   offline/online boundary
//! - **Nothing silently dropped**: eviction only prunes regenerable
//!   (non-audio) items, and exhausted items move to the dead-letter set

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ItemId};
use crate::domain::sync::{NewQueuedItem, QueuedItem};

/// Durable queue port for offline-created work.
///
/// Implementations must ensure:
/// - `enqueue` fails with `QueueFull` only when storage is exhausted and
///   the eviction policy cannot free space (all remaining items audio)
/// - all operations are atomic per item
#[async_trait]
pub trait OfflineQueue: Send + Sync {
    /// Appends an item, evicting old regenerable items if storage is
    /// full.
    ///
    /// # Errors
    ///
    /// - `QueueFull` when storage is exhausted; callers must surface a
    ///   user-visible storage warning
    async fn enqueue(&self, item: NewQueuedItem) -> Result<ItemId, DomainError>;

    /// Returns up to `max_items` pending items, oldest first, marking
    /// them in-flight. Does not remove them.
    async fn dequeue_batch(&self, max_items: usize) -> Result<Vec<QueuedItem>, DomainError>;

    /// Removes successfully synced items.
    async fn acknowledge(&self, ids: &[ItemId]) -> Result<(), DomainError>;

    /// Returns in-flight items to pending after a failed attempt,
    /// incrementing their retry count.
    async fn requeue(&self, ids: &[ItemId]) -> Result<(), DomainError>;

    /// Returns in-flight items to pending without counting an attempt
    /// (the batch was never uploaded, e.g. mid-sync connectivity loss).
    async fn release(&self, ids: &[ItemId]) -> Result<(), DomainError>;

    /// Moves items to the dead-letter set.
    async fn dead_letter(&self, ids: &[ItemId]) -> Result<(), DomainError>;

    /// All dead-lettered items, for inspection and error summaries.
    async fn dead_lettered(&self) -> Result<Vec<QueuedItem>, DomainError>;

    /// Number of pending (not in-flight, not dead-lettered) items.
    async fn pending_count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn offline_queue_is_object_safe() {
        fn _accepts_dyn(_queue: &dyn OfflineQueue) {}
    }
}
