//! Token definitions and their mutable economic state.
//!
//! A [`Token`] is an issued accounting unit, not an on-chain asset. Its
//! economic shape is exactly one of two variants:
//!
//! - [`TokenEconomics::FixedSupply`]: a capped pool sold at a constant
//!   price; `remaining_supply` only decreases (floored at zero).
//! - [`TokenEconomics::DynamicPrice`]: uncapped issuance with a price that
//!   rises multiplicatively with every confirmed purchase.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, SettleError, TokenId};

/// Economic state of a token. The enum makes "exactly one shape populated"
/// structural rather than a runtime invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenEconomics {
    /// Capped pool at a constant price.
    FixedSupply {
        /// Total units ever offered.
        total_supply: Decimal,
        /// Units still available (0 ≤ remaining ≤ total).
        remaining_supply: Decimal,
        /// Constant price per unit.
        price_per_unit: Decimal,
    },
    /// Uncapped issuance with a purchase-driven price curve.
    DynamicPrice {
        /// Cumulative units issued. Monotonically non-decreasing.
        issued_supply: Decimal,
        /// Current price per unit. Monotonically non-decreasing under
        /// normal operation.
        current_price: Decimal,
    },
}

impl TokenEconomics {
    /// Validate the field invariants for a freshly created token.
    ///
    /// # Errors
    /// Returns [`SettleError::InvalidToken`] on a negative or inconsistent
    /// field (remaining > total, negative price, etc.).
    pub fn validate(&self) -> Result<(), SettleError> {
        match self {
            Self::FixedSupply {
                total_supply,
                remaining_supply,
                price_per_unit,
            } => {
                if *total_supply <= Decimal::ZERO {
                    return Err(SettleError::InvalidToken {
                        reason: "total_supply must be positive".into(),
                    });
                }
                if *remaining_supply < Decimal::ZERO || remaining_supply > total_supply {
                    return Err(SettleError::InvalidToken {
                        reason: "remaining_supply must be within [0, total_supply]".into(),
                    });
                }
                if *price_per_unit <= Decimal::ZERO {
                    return Err(SettleError::InvalidToken {
                        reason: "price_per_unit must be positive".into(),
                    });
                }
            }
            Self::DynamicPrice {
                issued_supply,
                current_price,
            } => {
                if *issued_supply < Decimal::ZERO {
                    return Err(SettleError::InvalidToken {
                        reason: "issued_supply must be non-negative".into(),
                    });
                }
                if *current_price <= Decimal::ZERO {
                    return Err(SettleError::InvalidToken {
                        reason: "current_price must be positive".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Current per-unit price snapshot.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        match self {
            Self::FixedSupply { price_per_unit, .. } => *price_per_unit,
            Self::DynamicPrice { current_price, .. } => *current_price,
        }
    }

    /// Units still purchasable, or `None` when issuance is uncapped.
    #[must_use]
    pub fn available(&self) -> Option<Decimal> {
        match self {
            Self::FixedSupply {
                remaining_supply, ..
            } => Some(*remaining_supply),
            Self::DynamicPrice { .. } => None,
        }
    }
}

/// An issued token: identity, payee, and economic state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Globally unique token identifier.
    pub id: TokenId,
    /// The account that receives payments for this token.
    pub owner: AccountId,
    /// Economic state (supply pool or price curve).
    pub economics: TokenEconomics,
    /// When the token was created.
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Create a token with validated economics.
    ///
    /// # Errors
    /// Returns [`SettleError::InvalidToken`] if the economics fail
    /// [`TokenEconomics::validate`].
    pub fn new(owner: AccountId, economics: TokenEconomics) -> Result<Self, SettleError> {
        economics.validate()?;
        Ok(Self {
            id: TokenId::new(),
            owner,
            economics,
            created_at: Utc::now(),
        })
    }

    /// Quote the cost of buying `quantity` units at the current snapshot.
    #[must_use]
    pub fn quote(&self, quantity: Decimal) -> Decimal {
        quantity * self.economics.unit_price()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.economics {
            TokenEconomics::FixedSupply {
                remaining_supply,
                total_supply,
                price_per_unit,
            } => write!(
                f,
                "Token[{}] fixed {remaining_supply}/{total_supply} @ {price_per_unit}",
                self.id
            ),
            TokenEconomics::DynamicPrice {
                issued_supply,
                current_price,
            } => write!(
                f,
                "Token[{}] dynamic issued={issued_supply} @ {current_price}",
                self.id
            ),
        }
    }
}
