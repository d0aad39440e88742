//! Per-session mutual exclusion.
//!
//! All mutations to one session, whether from live dialogue turns or
//! from sync-driven merges, are serialized through a session-keyed lock.
//! Different sessions proceed independently; there is no global lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Registry of per-session async locks.
///
/// Lock entries are created on first use and kept for the process
/// lifetime; the registry is bounded by the number of sessions a single
/// device touches, which is small.
#[derive(Default)]
pub struct SessionLocks {
    locks: StdMutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one session, waiting if a live turn or a
    /// sync merge currently holds it.
    pub async fn acquire(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .expect("SessionLocks: registry lock poisoned");
            locks.entry(id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }
}
