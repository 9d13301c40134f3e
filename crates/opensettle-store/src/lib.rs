//! # opensettle-store
//!
//! Persistence boundary for OpenSettle: a path-addressed key-value store of
//! JSON records.
//!
//! The store is the single source of truth — no engine component caches
//! economic state across calls. The one capability the engine's concurrency
//! model demands of any backend is **per-key atomic read-modify-write**
//! ([`KvStore::update_raw`]): a plain read-then-write would admit
//! lost-update races between concurrent balance credits. No cross-key
//! transactions are assumed.
//!
//! - [`KvStore`]: the dyn-compatible backend trait (raw JSON values)
//! - [`KvStoreExt`]: blanket typed helpers over serde
//! - [`MemoryStore`]: in-process implementation with per-key entry locks

pub mod kv;
pub mod memory;

pub use kv::{KvStore, KvStoreExt};
pub use memory::MemoryStore;
