//! Per-(token, account) balance store.
//!
//! Balances are created implicitly on first credit and never deleted —
//! zero is a valid resting value. Every mutation is an atomic per-key
//! read-modify-write at the storage layer; the debit's check-then-subtract
//! runs inside one closure so a concurrent credit cannot interleave.
//!
//! Keys embed the normalized account so differently encoded addresses
//! resolve to the same holding.

use std::sync::Arc;

use opensettle_store::{KvStore, KvStoreExt};
use opensettle_types::{AccountId, Result, SettleError, TokenId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn balance_key(account: &AccountId, token_id: TokenId) -> String {
    format!("balances/{}/{token_id}", account.normalized())
}

fn account_prefix(account: &AccountId) -> String {
    format!("balances/{}/", account.normalized())
}

/// One holding reported by [`BalanceStore::balances_for`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub token_id: TokenId,
    pub amount: Decimal,
}

/// Per-(token, account) holdings. The settlement engine and the transfer
/// component are the only writers.
#[derive(Clone)]
pub struct BalanceStore {
    store: Arc<dyn KvStore>,
}

impl BalanceStore {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Atomically add `amount` to the holding, creating it at zero first.
    /// Returns the balance after the credit.
    pub fn credit(
        &self,
        token_id: TokenId,
        account: &AccountId,
        amount: Decimal,
    ) -> Result<Decimal> {
        let updated = self
            .store
            .update_record::<Decimal, _>(&balance_key(account, token_id), |current| {
                Ok(Some(current.unwrap_or(Decimal::ZERO) + amount))
            })?;
        Ok(updated.unwrap_or(Decimal::ZERO))
    }

    /// Atomically subtract `amount`, failing without mutation if the
    /// holding is smaller. Returns the balance after the debit.
    ///
    /// # Errors
    /// Returns [`SettleError::InsufficientBalance`] on shortfall.
    pub fn debit(
        &self,
        token_id: TokenId,
        account: &AccountId,
        amount: Decimal,
    ) -> Result<Decimal> {
        let updated = self
            .store
            .update_record::<Decimal, _>(&balance_key(account, token_id), |current| {
                let held = current.unwrap_or(Decimal::ZERO);
                if held < amount {
                    return Err(SettleError::InsufficientBalance {
                        requested: amount,
                        held,
                    });
                }
                Ok(Some(held - amount))
            })?;
        Ok(updated.unwrap_or(Decimal::ZERO))
    }

    /// Current holding for one (token, account) pair; zero if never
    /// credited.
    pub fn balance(&self, token_id: TokenId, account: &AccountId) -> Result<Decimal> {
        Ok(self
            .store
            .get_record(&balance_key(account, token_id))?
            .unwrap_or(Decimal::ZERO))
    }

    /// All positive holdings for an account (zero-value entries exist in
    /// storage but are not reported).
    pub fn balances_for(&self, account: &AccountId) -> Result<Vec<AccountBalance>> {
        let prefix = account_prefix(account);
        let mut holdings = Vec::new();
        for key in self.store.keys_with_prefix(&prefix)? {
            let Some(token_id) = key
                .strip_prefix(&prefix)
                .and_then(opensettle_types::TokenId::parse)
            else {
                continue;
            };
            let amount: Decimal = self.store.get_record(&key)?.unwrap_or(Decimal::ZERO);
            if amount > Decimal::ZERO {
                holdings.push(AccountBalance { token_id, amount });
            }
        }
        holdings.sort_by(|a, b| b.token_id.cmp(&a.token_id));
        Ok(holdings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensettle_store::MemoryStore;

    fn balances() -> BalanceStore {
        BalanceStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn credit_creates_implicitly() {
        let bal = balances();
        let token = TokenId::new();
        let acct = AccountId::new("GBUYER");
        assert_eq!(bal.balance(token, &acct).unwrap(), Decimal::ZERO);

        let after = bal.credit(token, &acct, Decimal::new(10, 0)).unwrap();
        assert_eq!(after, Decimal::new(10, 0));
        assert_eq!(bal.balance(token, &acct).unwrap(), Decimal::new(10, 0));
    }

    #[test]
    fn debit_checks_and_subtracts() {
        let bal = balances();
        let token = TokenId::new();
        let acct = AccountId::new("GBUYER");
        bal.credit(token, &acct, Decimal::new(10, 0)).unwrap();

        let after = bal.debit(token, &acct, Decimal::new(4, 0)).unwrap();
        assert_eq!(after, Decimal::new(6, 0));
    }

    #[test]
    fn debit_shortfall_leaves_balance_untouched() {
        let bal = balances();
        let token = TokenId::new();
        let acct = AccountId::new("GBUYER");
        bal.credit(token, &acct, Decimal::new(5, 0)).unwrap();

        let err = bal.debit(token, &acct, Decimal::new(10, 0)).unwrap_err();
        assert!(matches!(
            err,
            SettleError::InsufficientBalance { requested, held }
                if requested == Decimal::new(10, 0) && held == Decimal::new(5, 0)
        ));
        assert_eq!(bal.balance(token, &acct).unwrap(), Decimal::new(5, 0));
    }

    #[test]
    fn address_encodings_share_a_holding() {
        let bal = balances();
        let token = TokenId::new();
        bal.credit(token, &AccountId::new("0xAbCd"), Decimal::new(3, 0))
            .unwrap();
        assert_eq!(
            bal.balance(token, &AccountId::new("0X-AB-CD")).unwrap(),
            Decimal::new(3, 0)
        );
    }

    #[test]
    fn balances_for_reports_positive_only() {
        let bal = balances();
        let acct = AccountId::new("GBUYER");
        let t1 = TokenId::new();
        let t2 = TokenId::new();
        bal.credit(t1, &acct, Decimal::new(10, 0)).unwrap();
        bal.credit(t2, &acct, Decimal::new(4, 0)).unwrap();
        bal.debit(t2, &acct, Decimal::new(4, 0)).unwrap();

        let holdings = bal.balances_for(&acct).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].token_id, t1);
        assert_eq!(holdings[0].amount, Decimal::new(10, 0));
    }

    #[test]
    fn concurrent_credits_do_not_lose_updates() {
        let bal = Arc::new(balances());
        let token = TokenId::new();
        let acct = AccountId::new("GBUYER");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let bal = Arc::clone(&bal);
            let acct = acct.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    bal.credit(token, &acct, Decimal::ONE).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(bal.balance(token, &acct).unwrap(), Decimal::new(400, 0));
    }
}
