//! Per-key mutual exclusion for async critical sections.
//!
//! The locking discipline is per-entity (sale id, balance key) — never a
//! single global lock — so unrelated sales and tokens settle concurrently.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

/// A table of lazily created async mutexes, one per key.
///
/// `acquire` spans an entire read-verify-apply sequence; a lock taken only
/// at the final write would still let two callers pass the same
/// "already confirmed?" check.
pub struct KeyedLocks<K: Eq + Hash + Clone> {
    table: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the critical section for `key`, waiting if another caller
    /// holds it. Unrelated keys never contend.
    pub async fn acquire(&self, key: &K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock();
            Arc::clone(table.entry(key.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of keys that have ever been locked (table is not pruned).
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}
