//! Configuration for the OpenSettle engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunables for verification and economic-effect application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Tolerance subtracted from a sale's cost when matching a payment
    /// amount (absorbs rounding in currency-unit conversion).
    pub match_epsilon: Decimal,
    /// Price-impact constant α for dynamic-price tokens.
    pub price_impact_alpha: Decimal,
    /// Recency window for the seller-account transaction scan, in seconds.
    pub recent_window_secs: u64,
    /// Maximum transactions fetched per recent-transaction scan.
    pub recent_tx_limit: usize,
    /// Hard timeout for a single ledger oracle request, in milliseconds.
    pub oracle_timeout_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            match_epsilon: constants::DEFAULT_MATCH_EPSILON,
            price_impact_alpha: constants::DEFAULT_PRICE_IMPACT_ALPHA,
            recent_window_secs: constants::DEFAULT_RECENT_WINDOW_SECS,
            recent_tx_limit: constants::DEFAULT_RECENT_TX_LIMIT,
            oracle_timeout_ms: constants::DEFAULT_ORACLE_TIMEOUT_MS,
        }
    }
}
