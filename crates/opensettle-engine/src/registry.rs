//! Token registry: definitions and economic state.
//!
//! The registry is the exclusive mutator of `remaining_supply`,
//! `issued_supply`, and `current_price`. Economic updates run inside the
//! store's per-key atomic closure, so concurrent confirmations of
//! different sales on the same token serialize their read-modify-write.

use std::sync::Arc;

use opensettle_store::{KvStore, KvStoreExt};
use opensettle_types::{AccountId, Result, SettleError, Token, TokenEconomics, TokenId};
use rust_decimal::Decimal;

/// Storage path for a token record.
fn token_key(id: TokenId) -> String {
    format!("tokens/{id}")
}

/// Token definitions and their mutable economic state.
#[derive(Clone)]
pub struct TokenRegistry {
    store: Arc<dyn KvStore>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Create and persist a token with validated economics.
    ///
    /// # Errors
    /// Returns [`SettleError::InvalidToken`] on invalid economics.
    pub fn create(&self, owner: AccountId, economics: TokenEconomics) -> Result<Token> {
        let token = Token::new(owner, economics)?;
        self.store.put_record(&token_key(token.id), &token)?;
        tracing::info!(token = %token, "token created");
        Ok(token)
    }

    /// Fetch a token.
    ///
    /// # Errors
    /// Returns [`SettleError::TokenNotFound`] if absent.
    pub fn get(&self, id: TokenId) -> Result<Token> {
        self.store
            .get_record(&token_key(id))?
            .ok_or(SettleError::TokenNotFound(id))
    }

    /// All tokens, newest first (UUIDv7 ids embed creation time).
    pub fn list(&self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        for key in self.store.keys_with_prefix("tokens/")? {
            if let Some(token) = self.store.get_record::<Token>(&key)? {
                tokens.push(token);
            }
        }
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    /// Apply the economic effect of a confirmed sale of `quantity` units,
    /// atomically per token:
    ///
    /// - FixedSupply: `remaining_supply -= quantity`, floored at zero
    ///   (the order-time supply check is a snapshot, not a reservation,
    ///   so a concurrent oversell can push the decrement past zero)
    /// - DynamicPrice: `issued_supply += quantity`,
    ///   `current_price *= (1 + α·quantity)`
    ///
    /// Returns the token state after the update.
    ///
    /// # Errors
    /// Returns [`SettleError::TokenNotFound`] if the token vanished.
    pub fn apply_sale_effect(
        &self,
        id: TokenId,
        quantity: Decimal,
        alpha: Decimal,
    ) -> Result<Token> {
        let updated = self
            .store
            .update_record::<Token, _>(&token_key(id), |current| {
                let mut token = current.ok_or(SettleError::TokenNotFound(id))?;
                match &mut token.economics {
                    TokenEconomics::FixedSupply {
                        remaining_supply, ..
                    } => {
                        let next = *remaining_supply - quantity;
                        if next < Decimal::ZERO {
                            tracing::warn!(
                                token_id = %id,
                                remaining = %remaining_supply,
                                %quantity,
                                "supply decrement floored at zero (oversell race)"
                            );
                        }
                        *remaining_supply = next.max(Decimal::ZERO);
                    }
                    TokenEconomics::DynamicPrice {
                        issued_supply,
                        current_price,
                    } => {
                        *issued_supply += quantity;
                        *current_price *= Decimal::ONE + alpha * quantity;
                    }
                }
                Ok(Some(token))
            })?;
        updated.ok_or(SettleError::TokenNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensettle_store::MemoryStore;
    use opensettle_types::constants::DEFAULT_PRICE_IMPACT_ALPHA;

    fn registry() -> TokenRegistry {
        TokenRegistry::new(Arc::new(MemoryStore::new()))
    }

    fn fixed(total: i64, price: i64) -> TokenEconomics {
        TokenEconomics::FixedSupply {
            total_supply: Decimal::new(total, 0),
            remaining_supply: Decimal::new(total, 0),
            price_per_unit: Decimal::new(price, 0),
        }
    }

    #[test]
    fn create_and_get() {
        let reg = registry();
        let token = reg.create(AccountId::new("GOWNER"), fixed(100, 2)).unwrap();
        let fetched = reg.get(token.id).unwrap();
        assert_eq!(fetched, token);
    }

    #[test]
    fn get_missing_is_not_found() {
        let err = registry().get(TokenId::new()).unwrap_err();
        assert!(matches!(err, SettleError::TokenNotFound(_)));
    }

    #[test]
    fn invalid_economics_rejected() {
        let err = registry()
            .create(AccountId::new("GOWNER"), fixed(100, 0))
            .unwrap_err();
        assert!(matches!(err, SettleError::InvalidToken { .. }));
    }

    #[test]
    fn list_newest_first() {
        let reg = registry();
        let a = reg.create(AccountId::new("GOWNER"), fixed(10, 1)).unwrap();
        let b = reg.create(AccountId::new("GOWNER"), fixed(20, 1)).unwrap();
        let listed = reg.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
    }

    #[test]
    fn fixed_supply_decrements() {
        let reg = registry();
        let token = reg.create(AccountId::new("GOWNER"), fixed(100, 2)).unwrap();
        let after = reg
            .apply_sale_effect(token.id, Decimal::new(10, 0), DEFAULT_PRICE_IMPACT_ALPHA)
            .unwrap();
        assert_eq!(
            after.economics.available(),
            Some(Decimal::new(90, 0)),
        );
    }

    #[test]
    fn fixed_supply_floors_at_zero() {
        let reg = registry();
        let token = reg.create(AccountId::new("GOWNER"), fixed(5, 2)).unwrap();
        let after = reg
            .apply_sale_effect(token.id, Decimal::new(10, 0), DEFAULT_PRICE_IMPACT_ALPHA)
            .unwrap();
        assert_eq!(after.economics.available(), Some(Decimal::ZERO));
    }

    #[test]
    fn dynamic_price_rises_with_quantity() {
        let reg = registry();
        let token = reg
            .create(
                AccountId::new("GOWNER"),
                TokenEconomics::DynamicPrice {
                    issued_supply: Decimal::ZERO,
                    current_price: Decimal::new(1, 1), // 0.1
                },
            )
            .unwrap();
        // α = 0.005, q = 10 → price × 1.05 = 0.105
        let after = reg
            .apply_sale_effect(token.id, Decimal::new(10, 0), DEFAULT_PRICE_IMPACT_ALPHA)
            .unwrap();
        match after.economics {
            TokenEconomics::DynamicPrice {
                issued_supply,
                current_price,
            } => {
                assert_eq!(issued_supply, Decimal::new(10, 0));
                assert_eq!(current_price, Decimal::new(105, 3));
            }
            TokenEconomics::FixedSupply { .. } => panic!("wrong variant"),
        }
    }

    #[test]
    fn price_monotone_under_repeated_sales() {
        let reg = registry();
        let token = reg
            .create(
                AccountId::new("GOWNER"),
                TokenEconomics::DynamicPrice {
                    issued_supply: Decimal::ZERO,
                    current_price: Decimal::new(1, 1),
                },
            )
            .unwrap();
        let mut last = Decimal::new(1, 1);
        for _ in 0..5 {
            let after = reg
                .apply_sale_effect(token.id, Decimal::new(3, 0), DEFAULT_PRICE_IMPACT_ALPHA)
                .unwrap();
            let price = after.economics.unit_price();
            assert!(price >= last, "price regressed: {price} < {last}");
            last = price;
        }
    }
}
