//! In-memory Offline Queue for tests and the dev harness.
//!
//! Implements the full queue contract, including the eviction policy:
//! when storage is full, the least-recently-created regenerable item is
//! pruned; audio is never evicted.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode, ItemId};
use crate::domain::sync::{ItemStatus, NewQueuedItem, QueuedItem};
use crate::ports::OfflineQueue;

/// Vec-backed bounded queue.
pub struct InMemoryOfflineQueue {
    items: Mutex<Vec<QueuedItem>>,
    capacity: usize,
}

impl InMemoryOfflineQueue {
    /// Creates a queue bounded to `capacity` live (non-dead-letter)
    /// items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    // === Test Helpers ===

    /// Snapshot of every stored item (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn all_items(&self) -> Vec<QueuedItem> {
        self.items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned")
            .clone()
    }
}

#[async_trait]
impl OfflineQueue for InMemoryOfflineQueue {
    async fn enqueue(&self, item: NewQueuedItem) -> Result<ItemId, DomainError> {
        let mut items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");

        let live = items
            .iter()
            .filter(|i| i.status != ItemStatus::DeadLetter)
            .count();
        if live >= self.capacity {
            // evict the least-recently-created regenerable pending item
            let victim = items
                .iter()
                .filter(|i| i.status == ItemStatus::Pending && i.kind.is_evictable())
                .min_by_key(|i| i.timestamp)
                .map(|i| i.id);
            match victim {
                Some(id) => {
                    warn!(
                        target: "sahayak::queue",
                        item_id = %id,
                        "storage full, pruning oldest regenerable item"
                    );
                    items.retain(|i| i.id != id);
                }
                None => {
                    return Err(DomainError::new(
                        ErrorCode::QueueFull,
                        "Offline storage is full and only audio items remain",
                    ));
                }
            }
        }

        let queued = QueuedItem::from_new(item);
        let id = queued.id;
        items.push(queued);
        Ok(id)
    }

    async fn dequeue_batch(&self, max_items: usize) -> Result<Vec<QueuedItem>, DomainError> {
        let mut items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");

        let mut pending: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.status == ItemStatus::Pending)
            .map(|(idx, _)| idx)
            .collect();
        pending.sort_by_key(|&idx| items[idx].timestamp);
        pending.truncate(max_items);

        let mut batch = Vec::with_capacity(pending.len());
        for idx in pending {
            items[idx].status = ItemStatus::InFlight;
            batch.push(items[idx].clone());
        }
        Ok(batch)
    }

    async fn acknowledge(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        let mut items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");
        items.retain(|i| !ids.contains(&i.id));
        Ok(())
    }

    async fn requeue(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        let mut items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");
        for item in items.iter_mut().filter(|i| ids.contains(&i.id)) {
            item.status = ItemStatus::Pending;
            item.retry_count += 1;
        }
        Ok(())
    }

    async fn release(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        let mut items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");
        for item in items.iter_mut().filter(|i| ids.contains(&i.id)) {
            item.status = ItemStatus::Pending;
        }
        Ok(())
    }

    async fn dead_letter(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        let mut items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");
        for item in items.iter_mut().filter(|i| ids.contains(&i.id)) {
            item.status = ItemStatus::DeadLetter;
        }
        Ok(())
    }

    async fn dead_lettered(&self) -> Result<Vec<QueuedItem>, DomainError> {
        let items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");
        Ok(items
            .iter()
            .filter(|i| i.status == ItemStatus::DeadLetter)
            .cloned()
            .collect())
    }

    async fn pending_count(&self) -> Result<usize, DomainError> {
        let items = self
            .items
            .lock()
            .expect("InMemoryOfflineQueue: lock poisoned");
        Ok(items
            .iter()
            .filter(|i| i.status == ItemStatus::Pending)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DeviceTag, SessionId, Timestamp};
    use crate::domain::sync::ItemKind;

    fn new_item(kind: ItemKind, at: Timestamp) -> NewQueuedItem {
        NewQueuedItem {
            kind,
            payload: serde_json::json!({"text": "hello"}),
            session_id: SessionId::mint(&DeviceTag::local()),
            timestamp: at,
        }
    }

    #[tokio::test]
    async fn enqueue_then_dequeue_oldest_first() {
        let queue = InMemoryOfflineQueue::new(10);
        let t0 = Timestamp::now();
        queue
            .enqueue(new_item(ItemKind::Text, t0.plus_secs(10)))
            .await
            .unwrap();
        let first = queue.enqueue(new_item(ItemKind::Text, t0)).await.unwrap();

        let batch = queue.dequeue_batch(1).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, first);
        assert_eq!(batch[0].status, ItemStatus::InFlight);
    }

    #[tokio::test]
    async fn dequeue_does_not_remove_items() {
        let queue = InMemoryOfflineQueue::new(10);
        queue
            .enqueue(new_item(ItemKind::Text, Timestamp::now()))
            .await
            .unwrap();
        let batch = queue.dequeue_batch(5).await.unwrap();
        assert_eq!(batch.len(), 1);
        // in-flight items are not pending, but they still exist
        assert_eq!(queue.pending_count().await.unwrap(), 0);
        assert_eq!(queue.all_items().len(), 1);
    }

    #[tokio::test]
    async fn acknowledge_removes_items() {
        let queue = InMemoryOfflineQueue::new(10);
        queue
            .enqueue(new_item(ItemKind::Text, Timestamp::now()))
            .await
            .unwrap();
        let batch = queue.dequeue_batch(5).await.unwrap();
        let ids: Vec<ItemId> = batch.iter().map(|i| i.id).collect();
        queue.acknowledge(&ids).await.unwrap();
        assert!(queue.all_items().is_empty());
    }

    #[tokio::test]
    async fn requeue_increments_retry_count() {
        let queue = InMemoryOfflineQueue::new(10);
        queue
            .enqueue(new_item(ItemKind::Text, Timestamp::now()))
            .await
            .unwrap();
        let batch = queue.dequeue_batch(5).await.unwrap();
        let ids: Vec<ItemId> = batch.iter().map(|i| i.id).collect();

        queue.requeue(&ids).await.unwrap();
        let items = queue.all_items();
        assert_eq!(items[0].status, ItemStatus::Pending);
        assert_eq!(items[0].retry_count, 1);
    }

    #[tokio::test]
    async fn release_does_not_count_an_attempt() {
        let queue = InMemoryOfflineQueue::new(10);
        queue
            .enqueue(new_item(ItemKind::Text, Timestamp::now()))
            .await
            .unwrap();
        let batch = queue.dequeue_batch(5).await.unwrap();
        let ids: Vec<ItemId> = batch.iter().map(|i| i.id).collect();

        queue.release(&ids).await.unwrap();
        let items = queue.all_items();
        assert_eq!(items[0].status, ItemStatus::Pending);
        assert_eq!(items[0].retry_count, 0);
    }

    #[tokio::test]
    async fn dead_lettered_items_are_held_not_dropped() {
        let queue = InMemoryOfflineQueue::new(10);
        queue
            .enqueue(new_item(ItemKind::Text, Timestamp::now()))
            .await
            .unwrap();
        let batch = queue.dequeue_batch(5).await.unwrap();
        let ids: Vec<ItemId> = batch.iter().map(|i| i.id).collect();

        queue.dead_letter(&ids).await.unwrap();
        assert_eq!(queue.dead_lettered().await.unwrap().len(), 1);
        assert_eq!(queue.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn eviction_prunes_oldest_non_audio_first() {
        let queue = InMemoryOfflineQueue::new(2);
        let t0 = Timestamp::now();
        let oldest_text = queue.enqueue(new_item(ItemKind::Text, t0)).await.unwrap();
        queue
            .enqueue(new_item(ItemKind::Audio, t0.plus_secs(1)))
            .await
            .unwrap();

        // full: this enqueue must evict the oldest text item, not audio
        queue
            .enqueue(new_item(ItemKind::Text, t0.plus_secs(2)))
            .await
            .unwrap();

        let items = queue.all_items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.id != oldest_text));
        assert!(items.iter().any(|i| i.kind == ItemKind::Audio));
    }

    #[tokio::test]
    async fn queue_full_when_only_audio_remains() {
        let queue = InMemoryOfflineQueue::new(2);
        let t0 = Timestamp::now();
        queue.enqueue(new_item(ItemKind::Audio, t0)).await.unwrap();
        queue
            .enqueue(new_item(ItemKind::Audio, t0.plus_secs(1)))
            .await
            .unwrap();

        let err = queue
            .enqueue(new_item(ItemKind::Text, t0.plus_secs(2)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::QueueFull);
        // audio was preserved
        assert_eq!(queue.all_items().len(), 2);
    }
}
