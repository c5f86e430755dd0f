//! Per-entity write ordering
//!
//! A state change and the mirror write that follows it happen under the
//! entity's lock, so writes for one key reach storage in the order the
//! tracker applied them. Locks are created on demand and dropped again once
//! nobody holds or waits for them.

use std::sync::Arc;

use beacon_core::EntityKey;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    locks: DashMap<EntityKey, Arc<Mutex<()>>>,
}

impl KeyLocks {
    /// Wait for exclusive access to `key`
    pub(crate) async fn acquire(&self, key: &EntityKey) -> KeyGuard<'_> {
        let lock = self.locks.entry(key.clone()).or_default().value().clone();
        let guard = lock.lock_owned().await;

        KeyGuard {
            locks: self,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

pub(crate) struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: EntityKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Release first: afterwards the map holds the only reference unless
        // another task is waiting.
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
