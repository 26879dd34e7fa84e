//! Fixed-point price handling for dishes.
//!
//! Prices are kept at the storage scale of the `NUMERIC(10,4)` column and
//! rendered to clients with exactly two fraction digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fraction digits kept in storage
pub const STORAGE_SCALE: u32 = 4;

/// Fraction digits shown to clients
pub const DISPLAY_SCALE: u32 = 2;

/// Exclusive upper bound on the absolute value a `NUMERIC(10,4)` column can hold
pub const MAX_STORED_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round a client-supplied price to storage precision.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut stored = price.round_dp_with_strategy(STORAGE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    stored.rescale(STORAGE_SCALE);
    stored
}

/// Render a price with exactly two fraction digits, rounding half away from zero.
///
/// `123.456` renders as `"123.46"`, `0.005` as `"0.01"`, `5` as `"5.00"`.
pub fn format_price(price: Decimal) -> String {
    let mut shown = price.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    shown.rescale(DISPLAY_SCALE);
    shown.to_string()
}
