//! System-wide constants for the OpenSettle settlement engine.

use rust_decimal::Decimal;

/// Default tolerance subtracted from a sale's cost when matching a payment
/// amount, absorbing rounding in currency-unit conversion. 0.0001 units.
pub const DEFAULT_MATCH_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Default price-impact tuning constant α for dynamic-price tokens:
/// a confirmed purchase of quantity q multiplies the price by (1 + α·q).
/// 0.005 per unit.
pub const DEFAULT_PRICE_IMPACT_ALPHA: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Default recency window for the seller-account transaction scan (24h).
pub const DEFAULT_RECENT_WINDOW_SECS: u64 = 86_400;

/// Default maximum transactions fetched per recent-transaction scan.
pub const DEFAULT_RECENT_TX_LIMIT: usize = 50;

/// Default hard timeout for a single ledger oracle request.
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 5_000;

/// Amounts at or above this threshold are assumed to be reported in the
/// ledger's smallest unit and are rescaled. Heuristic, not protocol-
/// guaranteed.
pub const SMALLEST_UNIT_THRESHOLD: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Smallest-unit scale factor: 10^7 smallest units per whole unit.
pub const SMALLEST_UNIT_SCALE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSettle";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_is_small_positive() {
        assert!(DEFAULT_MATCH_EPSILON > Decimal::ZERO);
        assert!(DEFAULT_MATCH_EPSILON < Decimal::ONE);
        assert_eq!(DEFAULT_MATCH_EPSILON.to_string(), "0.0001");
    }

    #[test]
    fn alpha_default_value() {
        assert_eq!(DEFAULT_PRICE_IMPACT_ALPHA.to_string(), "0.005");
    }

    #[test]
    fn smallest_unit_scale_is_seven_decimals() {
        assert_eq!(SMALLEST_UNIT_SCALE, Decimal::new(10_000_000, 0));
        assert!(SMALLEST_UNIT_THRESHOLD < SMALLEST_UNIT_SCALE);
    }
}
