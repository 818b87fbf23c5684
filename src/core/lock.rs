//! Per-customer mutation serialization.
//!
//! Each customer gets its own async mutex, so mutations against one customer run one
//! at a time while different customers never wait on each other. Mutexes nobody
//! holds or waits on are dropped from the registry the next time a lock is handed
//! out, so the map only tracks customers with mutations in flight.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-customer locks.
#[derive(Debug, Default, Clone)]
pub struct CustomerLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl CustomerLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, customer_id: i64) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Guards and waiters each own a clone; a count of one means the entry is idle.
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(map.entry(customer_id).or_default())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Waits for exclusive access to `customer_id`'s ledger.
    pub async fn acquire(&self, customer_id: i64) -> OwnedMutexGuard<()> {
        self.handle(customer_id).lock_owned().await
    }
}
