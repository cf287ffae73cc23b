//! Common utility functions for tax calculations.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest amount (Rp 10^18) the front end accepts as input.
///
/// Totals of two such amounts and their tax stay well inside `Decimal`'s
/// range, so every calculation on them is exact.
pub const MAX_RUPIAH: Decimal = dec!(1000000000000000000);

/// Rounds to the nearest whole Rupiah, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pph_core::calculations::common::round_rupiah;
///
/// assert_eq!(round_rupiah(dec!(1234.49)), dec!(1234));
/// assert_eq!(round_rupiah(dec!(1234.5)), dec!(1235));
/// assert_eq!(round_rupiah(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_rupiah(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Floors a value at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Rounded share of `tax` proportional to `part / total`.
///
/// Multiplies first for an exact result. When `tax × part` leaves `Decimal`'s
/// range the ratio is taken first instead. `total` must be positive.
pub fn proportional_share(
    tax: Decimal,
    part: Decimal,
    total: Decimal,
) -> Decimal {
    let share = match tax.checked_mul(part) {
        Some(product) => product / total,
        None => part / total * tax,
    };
    round_rupiah(share)
}
