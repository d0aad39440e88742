//! Sync domain types - queue items, coordinator states, retry schedule.

mod backoff;
mod queued_item;
mod state;

pub use backoff::BackoffSchedule;
pub use queued_item::{ItemKind, ItemStatus, NewQueuedItem, QueuedItem};
pub use state::SyncState;
