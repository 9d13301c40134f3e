//! Payment-amount normalization.
//!
//! Some ledger endpoints report value in the ledger's smallest unit
//! (10^7 per whole unit), others in whole units. There is no protocol
//! guarantee either way, so the client applies a heuristic: values at or
//! above [`SMALLEST_UNIT_THRESHOLD`] are assumed to be smallest-unit
//! encoded and are divided by [`SMALLEST_UNIT_SCALE`].
//!
//! [`SMALLEST_UNIT_THRESHOLD`]: opensettle_types::constants::SMALLEST_UNIT_THRESHOLD
//! [`SMALLEST_UNIT_SCALE`]: opensettle_types::constants::SMALLEST_UNIT_SCALE

use opensettle_types::constants::{SMALLEST_UNIT_SCALE, SMALLEST_UNIT_THRESHOLD};
use rust_decimal::Decimal;

/// Rescale an oracle-reported amount into whole units.
///
/// Heuristic, not protocol-guaranteed: a genuine whole-unit payment at or
/// above the threshold would be rescaled incorrectly. The threshold is set
/// far above any sale cost this system produces.
#[must_use]
pub fn normalize_amount(raw: Decimal) -> Decimal {
    if raw >= SMALLEST_UNIT_THRESHOLD {
        raw / SMALLEST_UNIT_SCALE
    } else {
        raw
    }
}
