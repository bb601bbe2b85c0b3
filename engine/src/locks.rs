use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key async locks.
/// Work on different keys runs concurrently.
/// Work on the same key is serialized.
pub struct KeyedLocks<K> {
    /// Per-key mutexes
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
    /// Map size above which idle locks are pruned on the next acquisition
    cleanup_threshold: usize,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new(cleanup_threshold: usize) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            cleanup_threshold: cleanup_threshold.max(1),
        }
    }

    /// Acquire the lock for `key`, waiting for any current holder.
    pub async fn lock(&self, key: &K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= self.cleanup_threshold {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of keys with a lock entry, idle or held.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop lock entries that nobody holds or waits on.
    pub async fn cleanup(&self) {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}
