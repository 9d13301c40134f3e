//! Payment-to-sale candidate matching.
//!
//! A ledger transaction matches a sale when:
//!
//! 1. its paid amount covers the sale's locked cost minus a fixed epsilon
//!    (absorbing rounding in currency-unit conversion), AND
//! 2. its declared sender is unknown, OR the normalized sender equals the
//!    normalized buyer.
//!
//! Rule 2's fallback is deliberately lenient: address formats vary across
//! wallet providers, so strictness is traded for availability. The cost of
//! that policy is that an unrelated payer's amount-only transaction can
//! satisfy another buyer's sale — a product-level open question kept
//! isolated here so tightening is a one-function change.

use opensettle_types::{AccountId, LedgerTx};
use rust_decimal::Decimal;

/// Whether `tx` satisfies a sale of locked `cost` bought by `buyer`.
#[must_use]
pub fn payment_matches(tx: &LedgerTx, cost: Decimal, buyer: &AccountId, epsilon: Decimal) -> bool {
    if tx.amount < cost - epsilon {
        return false;
    }
    match &tx.sender {
        Some(sender) => sender.same_account(buyer),
        None => true,
    }
}

/// First matching transaction in `candidates`, preserving the oracle's
/// returned order.
#[must_use]
pub fn find_match<'a>(
    candidates: &'a [LedgerTx],
    cost: Decimal,
    buyer: &AccountId,
    epsilon: Decimal,
) -> Option<&'a LedgerTx> {
    candidates
        .iter()
        .find(|tx| payment_matches(tx, cost, buyer, epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensettle_types::TxHash;

    fn tx(amount: Decimal, sender: Option<&str>) -> LedgerTx {
        LedgerTx::new(TxHash::new("h"), amount, sender.map(AccountId::new))
    }

    fn eps() -> Decimal {
        Decimal::new(1, 4) // 0.0001
    }

    #[test]
    fn exact_amount_from_buyer_matches() {
        let buyer = AccountId::new("GBUYER");
        assert!(payment_matches(
            &tx(Decimal::new(20, 0), Some("GBUYER")),
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn overpayment_matches() {
        let buyer = AccountId::new("GBUYER");
        assert!(payment_matches(
            &tx(Decimal::new(25, 0), Some("GBUYER")),
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn underpayment_within_epsilon_matches() {
        let buyer = AccountId::new("GBUYER");
        // 19.9999 sits exactly at the cost - ε floor.
        assert!(payment_matches(
            &tx(Decimal::new(199_999, 4), Some("GBUYER")), // 19.9999
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn underpayment_beyond_epsilon_rejected() {
        let buyer = AccountId::new("GBUYER");
        assert!(!payment_matches(
            &tx(Decimal::new(1999, 2), Some("GBUYER")), // 19.99
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn wrong_sender_rejected() {
        let buyer = AccountId::new("GBUYER");
        assert!(!payment_matches(
            &tx(Decimal::new(20, 0), Some("GSOMEBODY")),
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn sender_encoding_variants_match() {
        let buyer = AccountId::new("0xAbCd01");
        assert!(payment_matches(
            &tx(Decimal::new(20, 0), Some("0X-ab-cd-01")),
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn unattributed_sender_matches_on_amount_alone() {
        // The documented leniency: no sender, sufficient amount = match.
        let buyer = AccountId::new("GBUYER");
        assert!(payment_matches(
            &tx(Decimal::new(20, 0), None),
            Decimal::new(20, 0),
            &buyer,
            eps()
        ));
    }

    #[test]
    fn first_match_wins_in_oracle_order() {
        let buyer = AccountId::new("GBUYER");
        let candidates = vec![
            tx(Decimal::new(5, 0), Some("GBUYER")),  // too small
            tx(Decimal::new(20, 0), None),           // first match
            tx(Decimal::new(20, 0), Some("GBUYER")), // also matches, but later
        ];
        let found = find_match(&candidates, Decimal::new(20, 0), &buyer, eps()).unwrap();
        assert!(found.sender.is_none());
    }

    #[test]
    fn no_candidates_no_match() {
        let buyer = AccountId::new("GBUYER");
        assert!(find_match(&[], Decimal::new(20, 0), &buyer, eps()).is_none());
        let candidates = vec![tx(Decimal::new(1, 0), None)];
        assert!(find_match(&candidates, Decimal::new(20, 0), &buyer, eps()).is_none());
    }
}
