//! The settlement engine — idempotent payment verification and atomic
//! effect application.
//!
//! `confirm_sale` is the only writer of sale status transitions beyond
//! Pending. The whole verify+apply sequence runs under a per-sale mutex
//! (not just the final write), so two concurrent confirmations of one sale
//! cannot both pass the "already Confirmed?" check.
//!
//! Effect application order is fixed:
//!
//! ```text
//! token effect → balance credit → sale flip → history append
//! ```
//!
//! The sale flip is the commit point checked by the idempotency guard: a
//! crash before it causes a re-invocation to redo the prior steps, a crash
//! after it leaves only history to re-derive from the confirmed sale.
//!
//! Oracle outages and unmatched payments are **not** errors: they park the
//! sale in `PendingCheck` and return a success envelope telling the caller
//! to retry later.

use std::sync::Arc;

use opensettle_oracle::LedgerOracle;
use opensettle_types::{
    ConfirmOutcome, HistoryEntry, HistoryKind, LedgerTx, Result, Sale, SaleId, SaleStatus,
    SettleConfig, TxHash,
};

use crate::balances::BalanceStore;
use crate::history::HistoryLog;
use crate::locks::KeyedLocks;
use crate::matching::{find_match, payment_matches};
use crate::registry::TokenRegistry;
use crate::sales::SaleLedger;

/// Orchestrates verification against the ledger oracle and the atomic
/// application of a confirmed sale's economic effects.
pub struct SettlementEngine {
    registry: TokenRegistry,
    sales: SaleLedger,
    balances: BalanceStore,
    history: HistoryLog,
    oracle: Arc<dyn LedgerOracle>,
    config: SettleConfig,
    sale_locks: KeyedLocks<SaleId>,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(
        registry: TokenRegistry,
        sales: SaleLedger,
        balances: BalanceStore,
        history: HistoryLog,
        oracle: Arc<dyn LedgerOracle>,
        config: SettleConfig,
    ) -> Self {
        Self {
            registry,
            sales,
            balances,
            history,
            oracle,
            config,
            sale_locks: KeyedLocks::new(),
        }
    }

    /// Verify payment for a sale and, on a match, apply its economic
    /// effects exactly once.
    ///
    /// Safe to call arbitrarily many times: an already-Confirmed sale
    /// returns [`ConfirmOutcome::Confirmed`] immediately with no further
    /// effect. Inconclusive verification (no candidate, oracle down)
    /// parks the sale in `PendingCheck` and returns a retry-later
    /// outcome, never an `Err`.
    ///
    /// # Errors
    /// Returns [`SettleError::SaleNotFound`] for an unknown sale, or a
    /// storage error if the state store fails mid-sequence.
    ///
    /// [`SettleError::SaleNotFound`]: opensettle_types::SettleError::SaleNotFound
    pub async fn confirm_sale(
        &self,
        sale_id: SaleId,
        tx_hash: Option<TxHash>,
    ) -> Result<ConfirmOutcome> {
        let _guard = self.sale_locks.acquire(&sale_id).await;

        let sale = self.sales.get(sale_id)?;
        if sale.status == SaleStatus::Confirmed {
            tracing::debug!(%sale_id, "confirm on terminal sale (idempotent no-op)");
            return Ok(ConfirmOutcome::Confirmed);
        }

        let mut supplied_mismatch: Option<String> = None;
        let mut matched: Option<LedgerTx> = None;

        // Step 1: direct fetch of the caller-supplied hash. Unavailable or
        // not-found falls through to the recent-transaction scan rather
        // than failing outright.
        if let Some(hash) = &tx_hash {
            match self.oracle.transaction_by_hash(hash).await {
                Ok(Some(tx)) => {
                    if payment_matches(&tx, sale.cost, &sale.buyer, self.config.match_epsilon) {
                        matched = Some(tx);
                    } else {
                        supplied_mismatch = Some(mismatch_reason(&tx, &sale));
                        tracing::debug!(%sale_id, %hash, "supplied transaction does not match sale");
                    }
                }
                Ok(None) => {
                    tracing::debug!(%sale_id, %hash, "supplied hash unknown to ledger");
                }
                Err(err) => {
                    tracing::warn!(%sale_id, %hash, %err, "direct fetch failed, falling back to scan");
                }
            }
        }

        // Step 2: bounded scan of the seller's recent incoming payments.
        if matched.is_none() {
            match self
                .oracle
                .recent_transactions(
                    &sale.seller,
                    self.config.recent_window_secs,
                    self.config.recent_tx_limit,
                )
                .await
            {
                Ok(candidates) => {
                    matched = find_match(
                        &candidates,
                        sale.cost,
                        &sale.buyer,
                        self.config.match_epsilon,
                    )
                    .cloned();
                }
                Err(err) => {
                    self.sales.park_pending_check(sale_id)?;
                    tracing::warn!(%sale_id, %err, "oracle unavailable, sale parked");
                    return Ok(ConfirmOutcome::PendingCheck {
                        reason: err.to_string(),
                    });
                }
            }
        }

        let Some(tx) = matched else {
            self.sales.park_pending_check(sale_id)?;
            return Ok(match supplied_mismatch {
                Some(reason) => ConfirmOutcome::Mismatch { reason },
                None => ConfirmOutcome::PendingCheck {
                    reason: "no matching payment found in recency window".into(),
                },
            });
        };

        self.apply_effects(&sale, &tx)?;
        Ok(ConfirmOutcome::Confirmed)
    }

    /// Apply the economic effects of a verified sale, in the fixed order
    /// token → balance → sale flip → history.
    fn apply_effects(&self, sale: &Sale, tx: &LedgerTx) -> Result<()> {
        self.registry.apply_sale_effect(
            sale.token_id,
            sale.quantity,
            self.config.price_impact_alpha,
        )?;

        // Credit only: units are minted from supply, not moved from a
        // seller-held balance.
        self.balances
            .credit(sale.token_id, &sale.buyer, sale.quantity)?;

        // Commit point. After this flip, re-invocations are no-ops.
        self.sales.confirm(sale.id, tx.hash.clone())?;

        self.history.append(
            &sale.buyer,
            HistoryEntry::new(
                HistoryKind::SaleConfirmed,
                sale.token_id,
                sale.seller.clone(),
                sale.quantity,
            )
            .with_sale(sale.id, sale.cost)
            .with_tx(tx.hash.clone()),
        )?;
        self.history.append(
            &sale.seller,
            HistoryEntry::new(
                HistoryKind::SaleConfirmed,
                sale.token_id,
                sale.buyer.clone(),
                sale.quantity,
            )
            .with_sale(sale.id, sale.cost)
            .with_tx(tx.hash.clone()),
        )?;

        tracing::info!(sale = %sale, tx = %tx.hash, "sale settled");
        Ok(())
    }
}

fn mismatch_reason(tx: &LedgerTx, sale: &Sale) -> String {
    if tx.amount < sale.cost {
        format!(
            "transaction {} pays {} but sale costs {}",
            tx.hash, tx.amount, sale.cost
        )
    } else {
        format!(
            "transaction {} sender does not match buyer {}",
            tx.hash, sale.buyer
        )
    }
}
