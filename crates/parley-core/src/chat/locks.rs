//! Per-session mutual exclusion within one process.
//!
//! Optional: without it, concurrent writers to one session race and the last
//! save wins.

use std::sync::Arc;

use dashmap::DashMap;
use parley_types::session::SessionId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-session async mutexes, created on first use.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`. Released on drop.
    pub async fn acquire(&self, session_id: &SessionId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is not held across the await.
        let lock = self
            .locks
            .entry(session_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the table entry for a session that no longer exists.
    pub fn forget(&self, session_id: &SessionId) {
        self.locks.remove(session_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
