//! Common utility functions for tip calculations.
//!
//! This module provides shared functionality used across the tip and
//! per-person calculations, including rounding policies and the currency
//! formatting used at the display boundary.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Rounding;

/// Rounds to cents, with half a cent going away from zero.
///
/// Used only when money is shown; derived values are kept unrounded.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tip_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1.875)), dec!(1.88));
/// assert_eq!(round_half_up(dec!(7.2049)), dec!(7.20));
/// assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a [`Rounding`] policy to a monetary value.
///
/// `Up` takes the ceiling and `Down` the floor, both to whole currency
/// units. `Exact` returns the value untouched.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tip_core::Rounding;
/// use tip_core::calculations::common::apply_rounding;
///
/// assert_eq!(apply_rounding(dec!(7.20), Rounding::Up), dec!(8));
/// assert_eq!(apply_rounding(dec!(3.67), Rounding::Down), dec!(3));
/// assert_eq!(apply_rounding(dec!(3.67), Rounding::Exact), dec!(3.67));
/// ```
pub fn apply_rounding(
    value: Decimal,
    rounding: Rounding,
) -> Decimal {
    match rounding {
        Rounding::Up => value.ceil(),
        Rounding::Down => value.floor(),
        Rounding::Exact => value,
    }
}

/// Returns `percent` percent of `value`, or `None` when the product does
/// not fit in a [`Decimal`].
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tip_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(48.00), dec!(15)), Some(dec!(7.20)));
/// assert_eq!(percent_of(Decimal::MAX, dec!(200)), None);
/// ```
pub fn percent_of(
    value: Decimal,
    percent: Decimal,
) -> Option<Decimal> {
    value.checked_mul(percent)?.checked_div(Decimal::ONE_HUNDRED)
}

/// Formats a value for display as currency.
///
/// The value is rounded half-up to cents, grouped in thousands with commas
/// and prefixed with `symbol`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tip_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(0), "$"), "$0.00");
/// assert_eq!(format_currency(dec!(1234567.891), "$"), "$1,234,567.89");
/// ```
pub fn format_currency(
    value: Decimal,
    symbol: &str,
) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = match text.split_once('.') {
        Some(parts) => parts,
        None => (text.as_str(), "00"),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{symbol}{grouped}.{cents}")
}
