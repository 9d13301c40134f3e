//! The key-value backend trait and its typed extension.

use opensettle_types::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A path-addressed key-value store of JSON records.
///
/// Keys are slash-separated paths (`"sales/<id>"`, `"balances/<token>/<addr>"`).
/// Implementations must make [`update_raw`](Self::update_raw) atomic per
/// key: while one closure runs for a key, no other mutation of that key may
/// interleave. Distinct keys must not serialize against each other.
pub trait KvStore: Send + Sync {
    /// Read the record at `key`, if present.
    fn get_raw(&self, key: &str) -> Result<Option<Value>>;

    /// Write the record at `key`, replacing any previous value.
    fn put_raw(&self, key: &str, value: Value) -> Result<()>;

    /// Remove the record at `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix` that currently hold a record.
    /// Order is unspecified.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Atomic per-key read-modify-write.
    ///
    /// `f` receives the current record (or `None`) and returns the record
    /// to store (or `None` to remove). If `f` errors, the key is left
    /// unchanged and the error propagates. Returns the value that was
    /// stored.
    fn update_raw(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<Value>) -> Result<Option<Value>>,
    ) -> Result<Option<Value>>;
}

/// Typed serde helpers over any [`KvStore`], including trait objects.
pub trait KvStoreExt: KvStore {
    /// Read and deserialize the record at `key`.
    fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write the record at `key`.
    fn put_record<T: Serialize>(&self, key: &str, record: &T) -> Result<()> {
        self.put_raw(key, serde_json::to_value(record)?)
    }

    /// Typed atomic per-key read-modify-write. Returns the stored record.
    fn update_record<T, F>(&self, key: &str, mut f: F) -> Result<Option<T>>
    where
        T: DeserializeOwned + Serialize,
        F: FnMut(Option<T>) -> Result<Option<T>>,
    {
        let mut raw = |current: Option<Value>| -> Result<Option<Value>> {
            let typed = match current {
                Some(value) => Some(serde_json::from_value(value)?),
                None => None,
            };
            match f(typed)? {
                Some(next) => Ok(Some(serde_json::to_value(&next)?)),
                None => Ok(None),
            }
        };
        match self.update_raw(key, &mut raw)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
