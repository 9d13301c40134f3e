//! The ledger oracle query trait.

use async_trait::async_trait;
use opensettle_types::{AccountId, LedgerTx, Result, TxHash};

/// Read-only client for the external blockchain ledger.
///
/// Both queries run fresh against the ledger on every call — results are
/// finite, in oracle-defined order, and not restartable across calls.
/// Implementations must bound each request with a timeout and map transport
/// failures to `SettleError::OracleUnavailable`.
#[async_trait]
pub trait LedgerOracle: Send + Sync {
    /// Fetch a single transaction by hash. `Ok(None)` means the ledger
    /// does not know the hash (distinct from the oracle being down).
    async fn transaction_by_hash(&self, hash: &TxHash) -> Result<Option<LedgerTx>>;

    /// Recent incoming transactions for `account`. Result order is
    /// oracle-defined: callers must not assume any particular order.
    /// `window_secs` bounds recency; `limit` bounds the result size.
    async fn recent_transactions(
        &self,
        account: &AccountId,
        window_secs: u64,
        limit: usize,
    ) -> Result<Vec<LedgerTx>>;
}
