//! Sale records and their verification lifecycle.
//!
//! A [`Sale`] is created once by the order desk with a price **locked at
//! creation time**, and thereafter mutated exclusively by the settlement
//! engine. The status machine:
//!
//! ```text
//! Pending --(verify success)--> Confirmed          [terminal]
//! Pending --(inconclusive)----> PendingCheck
//! PendingCheck --(re-invoked, success)--> Confirmed
//! PendingCheck --(still inconclusive)--> PendingCheck
//! Confirmed --(re-invoked)--> Confirmed            (idempotent no-op)
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, SaleId, TokenId, TxHash};

/// Verification lifecycle status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Created, payment not yet verified.
    Pending,
    /// Verification attempted but inconclusive; eligible for retry.
    PendingCheck,
    /// Payment verified, economic effects applied. Terminal.
    Confirmed,
}

impl SaleStatus {
    /// Whether the settlement engine may still move this sale to Confirmed.
    #[must_use]
    pub fn is_confirmable(self) -> bool {
        matches!(self, Self::Pending | Self::PendingCheck)
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::PendingCheck => "pending_check",
            Self::Confirmed => "confirmed",
        };
        write!(f, "{s}")
    }
}

/// A requested exchange of token quantity for an on-ledger payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Globally unique sale identifier.
    pub id: SaleId,
    /// The token being purchased.
    pub token_id: TokenId,
    /// The paying account.
    pub buyer: AccountId,
    /// The receiving account (the token owner at creation time).
    pub seller: AccountId,
    /// Units purchased. Always > 0.
    pub quantity: Decimal,
    /// Total cost, locked from the token snapshot at creation. Always > 0.
    pub cost: Decimal,
    /// Lifecycle status.
    pub status: SaleStatus,
    /// The matched ledger transaction, set when confirmed.
    pub tx_hash: Option<TxHash>,
    /// When the sale was created.
    pub created_at: DateTime<Utc>,
    /// When the sale was confirmed, if it has been.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Create a fresh Pending sale with a locked cost.
    #[must_use]
    pub fn pending(
        token_id: TokenId,
        buyer: AccountId,
        seller: AccountId,
        quantity: Decimal,
        cost: Decimal,
    ) -> Self {
        Self {
            id: SaleId::new(),
            token_id,
            buyer,
            seller,
            quantity,
            cost,
            status: SaleStatus::Pending,
            tx_hash: None,
            created_at: Utc::now(),
            confirmed_at: None,
        }
    }
}

impl std::fmt::Display for Sale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sale[{}] {} x{} = {} ({})",
            self.id, self.token_id, self.quantity, self.cost, self.status
        )
    }
}

/// Outcome of a `confirm_sale` call. All three variants are success
/// envelopes at the service boundary; only `Confirmed` applies effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    /// Payment verified; economic effects applied (or already had been).
    Confirmed,
    /// Verification inconclusive; retry later.
    PendingCheck {
        /// Human-readable reason (oracle outage, no candidate, ...).
        reason: String,
    },
    /// A caller-supplied transaction was fetched but failed the matching
    /// rule, and the recent-transaction scan found nothing either. The
    /// sale parks in `PendingCheck`; the distinct status is diagnostic.
    Mismatch {
        /// Why the supplied transaction did not match.
        reason: String,
    },
}

impl ConfirmOutcome {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}
