//! Order desk: turns a buy request into a Pending sale.
//!
//! The cost is **locked** from the token snapshot at creation time — it is
//! never re-derived at confirmation. The fixed-supply availability check is
//! a point-in-time read, not a reservation: two concurrent `create_sale`
//! calls can both pass it and jointly oversell. That race is accepted as
//! bounded — the eventual supply decrement floors at zero (see the
//! registry).

use opensettle_types::{
    AccountId, HistoryEntry, HistoryKind, Result, Sale, SettleError, TokenEconomics, TokenId,
};
use rust_decimal::Decimal;

use crate::history::HistoryLog;
use crate::registry::TokenRegistry;
use crate::sales::SaleLedger;

/// Creates sale records from buy requests.
#[derive(Clone)]
pub struct OrderDesk {
    registry: TokenRegistry,
    sales: SaleLedger,
    history: HistoryLog,
}

impl OrderDesk {
    #[must_use]
    pub fn new(registry: TokenRegistry, sales: SaleLedger, history: HistoryLog) -> Self {
        Self {
            registry,
            sales,
            history,
        }
    }

    /// Create a Pending sale for `quantity` units of `token_id`.
    ///
    /// Token economic state is only read here, never mutated — supply is
    /// checked, not reserved. One informational `SalePending` history
    /// entry is written per side; history is not authoritative for
    /// balances.
    ///
    /// # Errors
    /// - [`SettleError::InvalidInput`] if `quantity` ≤ 0
    /// - [`SettleError::TokenNotFound`] if the token is absent
    /// - [`SettleError::InsufficientSupply`] if a fixed-supply token has
    ///   fewer units remaining than requested (snapshot check)
    pub fn create_sale(
        &self,
        token_id: TokenId,
        buyer: AccountId,
        quantity: Decimal,
    ) -> Result<Sale> {
        if quantity <= Decimal::ZERO {
            return Err(SettleError::InvalidInput {
                reason: format!("quantity must be positive, got {quantity}"),
            });
        }

        let token = self.registry.get(token_id)?;
        if let TokenEconomics::FixedSupply {
            remaining_supply, ..
        } = &token.economics
        {
            if quantity > *remaining_supply {
                return Err(SettleError::InsufficientSupply {
                    requested: quantity,
                    remaining: *remaining_supply,
                });
            }
        }

        let cost = token.quote(quantity);
        let sale = Sale::pending(token_id, buyer.clone(), token.owner.clone(), quantity, cost);
        self.sales.insert(&sale)?;

        self.history.append(
            &buyer,
            HistoryEntry::new(
                HistoryKind::SalePending,
                token_id,
                token.owner.clone(),
                quantity,
            )
            .with_sale(sale.id, cost),
        )?;
        self.history.append(
            &token.owner,
            HistoryEntry::new(HistoryKind::SalePending, token_id, buyer, quantity)
                .with_sale(sale.id, cost),
        )?;

        tracing::info!(sale = %sale, "sale created");
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use opensettle_store::MemoryStore;
    use opensettle_types::SaleStatus;

    fn desk() -> (OrderDesk, TokenRegistry, SaleLedger, HistoryLog) {
        let store: Arc<dyn opensettle_store::KvStore> = Arc::new(MemoryStore::new());
        let registry = TokenRegistry::new(Arc::clone(&store));
        let sales = SaleLedger::new(Arc::clone(&store));
        let history = HistoryLog::new(Arc::clone(&store));
        (
            OrderDesk::new(registry.clone(), sales.clone(), history.clone()),
            registry,
            sales,
            history,
        )
    }

    fn fixed(total: i64, price: i64) -> TokenEconomics {
        TokenEconomics::FixedSupply {
            total_supply: Decimal::new(total, 0),
            remaining_supply: Decimal::new(total, 0),
            price_per_unit: Decimal::new(price, 0),
        }
    }

    #[test]
    fn sale_locks_cost_from_snapshot() {
        let (desk, registry, sales, _) = desk();
        let token = registry
            .create(AccountId::new("GSELLER"), fixed(100, 2))
            .unwrap();

        let sale = desk
            .create_sale(token.id, AccountId::new("GBUYER"), Decimal::new(10, 0))
            .unwrap();
        assert_eq!(sale.cost, Decimal::new(20, 0));
        assert_eq!(sale.status, SaleStatus::Pending);
        assert_eq!(sale.seller, AccountId::new("GSELLER"));

        // Persisted identically.
        assert_eq!(sales.get(sale.id).unwrap(), sale);
    }

    #[test]
    fn dynamic_cost_from_current_price() {
        let (desk, registry, _, _) = desk();
        let token = registry
            .create(
                AccountId::new("GSELLER"),
                TokenEconomics::DynamicPrice {
                    issued_supply: Decimal::ZERO,
                    current_price: Decimal::new(1, 1), // 0.1
                },
            )
            .unwrap();

        let sale = desk
            .create_sale(token.id, AccountId::new("GBUYER"), Decimal::new(10, 0))
            .unwrap();
        assert_eq!(sale.cost, Decimal::new(10, 1)); // 1.0
    }

    #[test]
    fn non_positive_quantity_rejected() {
        let (desk, registry, _, _) = desk();
        let token = registry
            .create(AccountId::new("GSELLER"), fixed(100, 2))
            .unwrap();

        let err = desk
            .create_sale(token.id, AccountId::new("GBUYER"), Decimal::ZERO)
            .unwrap_err();
        assert!(matches!(err, SettleError::InvalidInput { .. }));
    }

    #[test]
    fn missing_token_rejected() {
        let (desk, _, _, _) = desk();
        let err = desk
            .create_sale(TokenId::new(), AccountId::new("GBUYER"), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, SettleError::TokenNotFound(_)));
    }

    #[test]
    fn oversized_quantity_rejected_for_fixed_supply() {
        let (desk, registry, _, _) = desk();
        let token = registry
            .create(AccountId::new("GSELLER"), fixed(5, 2))
            .unwrap();

        let err = desk
            .create_sale(token.id, AccountId::new("GBUYER"), Decimal::new(6, 0))
            .unwrap_err();
        assert!(matches!(err, SettleError::InsufficientSupply { .. }));
    }

    #[test]
    fn order_does_not_touch_token_state() {
        let (desk, registry, _, _) = desk();
        let token = registry
            .create(AccountId::new("GSELLER"), fixed(100, 2))
            .unwrap();
        desk.create_sale(token.id, AccountId::new("GBUYER"), Decimal::new(10, 0))
            .unwrap();

        // Supply checked, not reserved.
        let after = registry.get(token.id).unwrap();
        assert_eq!(after.economics.available(), Some(Decimal::new(100, 0)));
    }

    #[test]
    fn pending_history_written_for_both_sides() {
        let (desk, registry, _, history) = desk();
        let token = registry
            .create(AccountId::new("GSELLER"), fixed(100, 2))
            .unwrap();
        let sale = desk
            .create_sale(token.id, AccountId::new("GBUYER"), Decimal::new(10, 0))
            .unwrap();

        let buyer_log = history.for_account(&AccountId::new("GBUYER")).unwrap();
        assert_eq!(buyer_log.len(), 1);
        assert_eq!(buyer_log[0].kind, HistoryKind::SalePending);
        assert_eq!(buyer_log[0].sale_id, Some(sale.id));

        let seller_log = history.for_account(&AccountId::new("GSELLER")).unwrap();
        assert_eq!(seller_log.len(), 1);
        assert_eq!(seller_log[0].counterparty, AccountId::new("GBUYER"));
    }
}
