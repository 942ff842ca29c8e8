//! Per-key serialisation of concurrent downloads.

use dashmap::DashMap;
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map of keys currently being worked on.
///
/// Entries are weak so a key disappears once every holder and waiter is gone.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    locks: DashMap<String, Weak<Mutex<()>>>,
}

impl InFlight {
    /// Wait until no one else holds `key`, then hold it until the guard drops.
    pub(crate) async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        self.locks.retain(|_, weak| weak.strong_count() > 0);
        let lock = {
            let mut slot = self.locks.entry(key.to_owned()).or_insert_with(Weak::new);
            match slot.upgrade() {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(Mutex::new(()));
                    *slot = Arc::downgrade(&lock);
                    lock
                }
            }
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.retain(|_, weak| weak.strong_count() > 0);
        self.locks.len()
    }
}
