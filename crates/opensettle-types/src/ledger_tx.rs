//! Normalized transaction facts reported by the external ledger oracle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, TxHash};

/// One payment observed on the external ledger, normalized to the units
/// the engine reasons in.
///
/// `sender` is `None` when the oracle could not attribute the payment to
/// an address — the matching rule then falls back to amount-only matching
/// (a documented leniency, see the engine's matching module).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTx {
    /// The ledger transaction hash.
    pub hash: TxHash,
    /// Paid amount, already rescaled out of smallest-unit encoding.
    pub amount: Decimal,
    /// Declared sender, when the oracle could attribute one.
    pub sender: Option<AccountId>,
    /// Ledger-reported timestamp of the transaction.
    pub timestamp: DateTime<Utc>,
}

impl LedgerTx {
    #[must_use]
    pub fn new(hash: TxHash, amount: Decimal, sender: Option<AccountId>) -> Self {
        Self {
            hash,
            amount,
            sender,
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for LedgerTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sender {
            Some(s) => write!(f, "Tx[{}] {} from {s}", self.hash, self.amount),
            None => write!(f, "Tx[{}] {} from <unattributed>", self.hash, self.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_unattributed_sender() {
        let tx = LedgerTx::new(TxHash::new("deadbeef"), Decimal::new(20, 0), None);
        assert!(tx.to_string().contains("<unattributed>"));
    }

    #[test]
    fn tx_serde_roundtrip() {
        let tx = LedgerTx::new(
            TxHash::new("deadbeef"),
            Decimal::new(205, 1),
            Some(AccountId::new("GBUYER")),
        );
        let json = serde_json::to_string(&tx).unwrap();
        let back: LedgerTx = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }
}
