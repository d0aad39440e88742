//! SQLite adapters - on-device durable storage.

mod context_store;
mod offline_queue;

pub use context_store::SqliteContextStore;
pub use offline_queue::SqliteOfflineQueue;
