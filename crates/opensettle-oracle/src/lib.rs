//! # opensettle-oracle
//!
//! Read-only boundary to the external blockchain ledger — the oracle that
//! decides whether a payment actually happened.
//!
//! The engine never trusts the oracle's availability: a transport failure
//! or timeout surfaces as [`SettleError::OracleUnavailable`] and the
//! settlement engine degrades it to a `PendingCheck` outcome rather than
//! failing the caller.
//!
//! - [`LedgerOracle`]: the async query trait (single-tx fetch + bounded
//!   recent-transaction scan)
//! - [`HttpLedgerOracle`]: reqwest-backed client with a hard timeout
//! - [`MemoryOracle`]: deterministic in-process double for tests and
//!   local runs
//! - [`normalize_amount`]: smallest-unit rescale heuristic
//!
//! [`SettleError::OracleUnavailable`]: opensettle_types::SettleError::OracleUnavailable

pub mod amount;
pub mod http;
pub mod memory;
pub mod oracle;

pub use amount::normalize_amount;
pub use http::HttpLedgerOracle;
pub use memory::MemoryOracle;
pub use oracle::LedgerOracle;
