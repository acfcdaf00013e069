//! Common money helpers shared by the item factory and the report generator.
//!
//! All arithmetic happens on [`Decimal`], so a value such as `1.005` is
//! exactly `1.005` and rounds to `1.01`. Binary floats would store it as
//! `1.00499999…` and lose a cent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use feira_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(1.005)), dec!(1.01));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a value with exactly two decimals and a `.` separator.
///
/// ```
/// use rust_decimal_macros::dec;
/// use feira_core::calculations::common::format_two_places;
///
/// assert_eq!(format_two_places(dec!(14.25)), "14.25");
/// assert_eq!(format_two_places(dec!(2)), "2.00");
/// assert_eq!(format_two_places(dec!(0.125)), "0.13");
/// ```
pub fn format_two_places(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Same as [`format_two_places`] but with `,` as the decimal separator.
pub fn format_two_places_comma(value: Decimal) -> String {
    format_two_places(value).replacen('.', ",", 1)
}
