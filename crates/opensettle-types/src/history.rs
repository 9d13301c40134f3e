//! Append-only per-account history of economic events.
//!
//! A [`HistoryEntry`] records one event from the perspective of one account
//! role (buyer, seller, sender, receiver). Entries are never mutated after
//! append; ordering is by event creation ([`EventId`] is UUIDv7, so ids
//! sort in creation order).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, EventId, SaleId, TokenId, TxHash};

/// The kind of economic event a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// A sale was created; informational only. History is not authoritative
    /// for balance state — only confirmed sales move balances.
    SalePending,
    /// A sale was confirmed and its effects applied.
    SaleConfirmed,
    /// Units left this account in a peer-to-peer transfer.
    TransferOut,
    /// Units arrived at this account in a peer-to-peer transfer.
    TransferIn,
}

/// Immutable record of one economic event for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Server-generated, creation-ordered event id.
    pub event_id: EventId,
    /// What happened.
    pub kind: HistoryKind,
    /// The token involved.
    pub token_id: TokenId,
    /// The sale this event belongs to, when sale-related.
    pub sale_id: Option<SaleId>,
    /// The other side of the event (seller for a buyer's entry, etc.).
    pub counterparty: AccountId,
    /// Units moved or purchased.
    pub quantity: Decimal,
    /// Cost in payment currency, when sale-related.
    pub cost: Option<Decimal>,
    /// The matched ledger transaction, when confirmed against one.
    pub tx_hash: Option<TxHash>,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped now with a fresh event id.
    #[must_use]
    pub fn new(
        kind: HistoryKind,
        token_id: TokenId,
        counterparty: AccountId,
        quantity: Decimal,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            kind,
            token_id,
            sale_id: None,
            counterparty,
            quantity,
            cost: None,
            tx_hash: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the sale context (id and locked cost).
    #[must_use]
    pub fn with_sale(mut self, sale_id: SaleId, cost: Decimal) -> Self {
        self.sale_id = Some(sale_id);
        self.cost = Some(cost);
        self
    }

    /// Attach the matched ledger transaction.
    #[must_use]
    pub fn with_tx(mut self, tx_hash: TxHash) -> Self {
        self.tx_hash = Some(tx_hash);
        self
    }
}
