//! In-process [`KvStore`] with per-key entry locks.
//!
//! The outer map is guarded by an `RwLock` taken only to locate (or lazily
//! insert) an entry; each entry carries its own `Mutex`, so updates to the
//! same key serialize while unrelated keys proceed in parallel. Removed
//! keys keep a `None` tombstone in the map, which keeps entry handles
//! stable under concurrent updates.

use std::collections::HashMap;
use std::sync::Arc;

use opensettle_types::Result;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::kv::KvStore;

type Entry = Arc<Mutex<Option<Value>>>;

/// In-memory key-value store satisfying the per-key atomicity contract.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the entry handle for `key`, inserting an empty one if absent.
    fn entry(&self, key: &str) -> Entry {
        if let Some(entry) = self.entries.read().get(key) {
            return Arc::clone(entry);
        }
        let mut map = self.entries.write();
        Arc::clone(map.entry(key.to_string()).or_default())
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        let entry = match self.entries.read().get(key) {
            Some(entry) => Arc::clone(entry),
            None => return Ok(None),
        };
        let guard = entry.lock();
        Ok(guard.clone())
    }

    fn put_raw(&self, key: &str, value: Value) -> Result<()> {
        let entry = self.entry(key);
        *entry.lock() = Some(value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if let Some(entry) = self.entries.read().get(key) {
            *entry.lock() = None;
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let map = self.entries.read();
        Ok(map
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.lock().is_some())
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn update_raw(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<Value>) -> Result<Option<Value>>,
    ) -> Result<Option<Value>> {
        let entry = self.entry(key);
        let mut guard = entry.lock();
        let next = f(guard.clone())?;
        *guard = next.clone();
        Ok(next)
    }
}
