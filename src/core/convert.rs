//! Currency conversion of the base value column

use crate::core::rates::RateEntry;
use crate::core::table::Table;
use tracing::debug;

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Adds one converted column per rate, in rate order.
///
/// Each new cell is `round2(value * multiplier)`. A code already present in
/// the table is recomputed in place, and the base currency code rewrites the
/// base column, which later rates in the list then convert from.
pub fn transform(mut table: Table, rates: &[RateEntry]) -> Table {
    for rate in rates {
        debug!(code = %rate.code, multiplier = rate.multiplier, "Converting values");
        table.set_converted(&rate.code, |value| round2(value * rate.multiplier));
    }
    table
}
