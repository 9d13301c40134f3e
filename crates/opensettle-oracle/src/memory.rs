//! Deterministic in-process ledger oracle.
//!
//! Used by the engine's test suites and local runs: transactions are
//! injected per receiving account, the recency window is applied from the
//! injected timestamps, and an outage switch makes every query fail with
//! `OracleUnavailable` to exercise the degrade-to-`PendingCheck` path.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use opensettle_types::{AccountId, LedgerTx, Result, SettleError, TxHash};
use parking_lot::Mutex;

use crate::oracle::LedgerOracle;

#[derive(Default)]
struct State {
    /// Injected transactions keyed by normalized receiving account.
    by_receiver: HashMap<String, Vec<LedgerTx>>,
    /// All injected transactions by hash.
    by_hash: HashMap<TxHash, LedgerTx>,
    /// When true, every query fails with `OracleUnavailable`.
    down: bool,
}

/// In-memory [`LedgerOracle`] double with injectable transactions.
#[derive(Default)]
pub struct MemoryOracle {
    state: Mutex<State>,
}

impl MemoryOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a transaction received by `receiver`.
    pub fn inject(&self, receiver: &AccountId, tx: LedgerTx) {
        let mut state = self.state.lock();
        state.by_hash.insert(tx.hash.clone(), tx.clone());
        state
            .by_receiver
            .entry(receiver.normalized())
            .or_default()
            .push(tx);
    }

    /// Toggle the outage switch.
    pub fn set_down(&self, down: bool) {
        self.state.lock().down = down;
    }

    fn check_up(state: &State) -> Result<()> {
        if state.down {
            return Err(SettleError::OracleUnavailable {
                reason: "oracle outage (injected)".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerOracle for MemoryOracle {
    async fn transaction_by_hash(&self, hash: &TxHash) -> Result<Option<LedgerTx>> {
        let state = self.state.lock();
        Self::check_up(&state)?;
        Ok(state.by_hash.get(hash).cloned())
    }

    async fn recent_transactions(
        &self,
        account: &AccountId,
        window_secs: u64,
        limit: usize,
    ) -> Result<Vec<LedgerTx>> {
        let state = self.state.lock();
        Self::check_up(&state)?;
        let cutoff = Utc::now() - Duration::seconds(i64::try_from(window_secs).unwrap_or(i64::MAX));
        let txs = state
            .by_receiver
            .get(&account.normalized())
            .map(|txs| {
                txs.iter()
                    .filter(|tx| tx.timestamp >= cutoff)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(txs)
    }
}
