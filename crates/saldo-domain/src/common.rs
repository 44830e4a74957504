//! Shared traits and the currency rounding rule.

use uuid::Uuid;

/// Days counted as one "month" when sizing a report window.
pub const DAYS_PER_WINDOW_MONTH: u64 = 30;

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving signed monetary amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Rounds a monetary value to two decimal places, half away from zero.
/// A result of zero is always positive zero.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
