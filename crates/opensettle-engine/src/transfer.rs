//! Peer-to-peer balance transfers.
//!
//! Independent of settlement but bound by the same invariants: the
//! check-then-debit on the source balance runs inside one atomic per-key
//! closure, and the whole debit+credit pair holds a per-(token, sender)
//! lock so concurrent transfers from the same holding serialize. Supply is
//! conserved — units move, none are minted or burned.

use opensettle_types::{
    AccountId, HistoryEntry, HistoryKind, Result, SettleError, TokenId,
};
use rust_decimal::Decimal;

use crate::balances::BalanceStore;
use crate::history::HistoryLog;
use crate::locks::KeyedLocks;
use crate::registry::TokenRegistry;

/// Moves token balances between accounts.
pub struct Transfers {
    registry: TokenRegistry,
    balances: BalanceStore,
    history: HistoryLog,
    /// Keyed by (token, normalized sender): concurrent transfers out of
    /// one holding serialize; unrelated holdings do not contend.
    holding_locks: KeyedLocks<(TokenId, String)>,
}

impl Transfers {
    #[must_use]
    pub fn new(registry: TokenRegistry, balances: BalanceStore, history: HistoryLog) -> Self {
        Self {
            registry,
            balances,
            history,
            holding_locks: KeyedLocks::new(),
        }
    }

    /// Move `amount` units of `token_id` from `from` to `to`, appending
    /// one history entry per side.
    ///
    /// # Errors
    /// - [`SettleError::InvalidInput`] if `amount` ≤ 0
    /// - [`SettleError::TokenNotFound`] if the token is absent
    /// - [`SettleError::InsufficientBalance`] if `from` holds less than
    ///   `amount`; no state is mutated in that case
    pub async fn transfer(
        &self,
        token_id: TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::InvalidInput {
                reason: format!("transfer amount must be positive, got {amount}"),
            });
        }
        self.registry.get(token_id)?;

        let _guard = self
            .holding_locks
            .acquire(&(token_id, from.normalized()))
            .await;

        // Debit first: it is the only step that can fail on a business
        // rule, and it fails without mutation.
        self.balances.debit(token_id, from, amount)?;
        self.balances.credit(token_id, to, amount)?;

        self.history.append(
            from,
            HistoryEntry::new(HistoryKind::TransferOut, token_id, to.clone(), amount),
        )?;
        self.history.append(
            to,
            HistoryEntry::new(HistoryKind::TransferIn, token_id, from.clone(), amount),
        )?;

        tracing::info!(%token_id, %from, %to, %amount, "transfer applied");
        Ok(())
    }
}
