//! Lenient numeric coercion for user-typed quantities and prices.
//!
//! Input comes straight from text fields, so it may use a comma as the
//! decimal separator (`"5,50"`), carry a unit suffix (`"2kg"`) or be plain
//! garbage. Coercion never fails: anything that does not start with a
//! non-negative number becomes zero.
//!
//! Amounts are bounded by [`MAX_AMOUNT`], which keeps `quantity * unit_price`
//! and the sum of a realistic list inside `Decimal`'s range. Larger values
//! count as out of range and also become zero.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Largest accepted quantity or unit price: one trillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Leading numeric prefix: optional sign, digits, optional fraction,
/// optional exponent (`"1e3"`, `"2,5E-1"`).
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<mantissa>[+-]?(?:\d+(?:\.\d*)?|\.\d+))(?:[eE](?P<exponent>[+-]?\d+))?")
        .expect("numeric prefix pattern is valid")
});

/// Coerces raw text to a non-negative [`Decimal`].
///
/// * Surrounding whitespace is ignored.
/// * The first `,` is read as the decimal separator.
/// * Only the leading numeric prefix is read (`"2kg"` → `2`).
/// * An exponent is honoured (`"1e3"` → `1000`).
/// * Empty, non-numeric, negative or out-of-range input yields `0`.
pub fn coerce_decimal(input: &str) -> Decimal {
    let normalized = input.trim().replacen(',', ".", 1);

    let Some(found) = NUMERIC_PREFIX.captures(&normalized) else {
        if !normalized.is_empty() {
            tracing::debug!(input = %input, "non-numeric input coerced to zero");
        }
        return Decimal::ZERO;
    };

    let mantissa = found["mantissa"].trim_end_matches('.');
    let value = match mantissa.parse::<Decimal>() {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(input = %input, "numeric input out of range, coerced to zero: {}", e);
            return Decimal::ZERO;
        }
    };

    let exponent = found.name("exponent").map(|m| m.as_str().parse::<i32>());
    let scaled = match exponent {
        None => Some(value),
        Some(Ok(exponent)) => scale_by_power_of_ten(value, exponent),
        Some(Err(_)) => None,
    };

    match scaled {
        Some(value) => clamp_amount(value),
        None => {
            tracing::debug!(input = %input, "exponent out of range, coerced to zero");
            Decimal::ZERO
        }
    }
}

/// `value * 10^exponent`, or `None` when the result leaves `Decimal`'s range.
fn scale_by_power_of_ten(value: Decimal, exponent: i32) -> Option<Decimal> {
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    // Past 10^±56 every non-zero mantissa overflows or vanishes.
    if exponent.unsigned_abs() > 56 {
        return None;
    }
    (0..exponent.unsigned_abs()).try_fold(value, |acc, _| {
        if exponent > 0 {
            acc.checked_mul(Decimal::TEN)
        } else {
            acc.checked_div(Decimal::TEN)
        }
    })
}

/// Replaces negative values and values above [`MAX_AMOUNT`] with zero.
pub fn clamp_amount(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        if !value.is_zero() {
            tracing::debug!(%value, "negative amount coerced to zero");
        }
        Decimal::ZERO
    } else if value > MAX_AMOUNT {
        tracing::debug!(%value, "amount above {MAX_AMOUNT} coerced to zero");
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn coerce_plain_integer() {
        assert_eq!(coerce_decimal("2"), dec!(2));
    }

    #[test]
    fn coerce_dot_decimal() {
        assert_eq!(coerce_decimal("5.50"), dec!(5.50));
    }

    #[test]
    fn coerce_comma_decimal() {
        assert_eq!(coerce_decimal("5,50"), dec!(5.5));
        assert_eq!(coerce_decimal("0,25"), dec!(0.25));
    }

    #[test]
    fn coerce_trims_whitespace() {
        assert_eq!(coerce_decimal("  3.25  "), dec!(3.25));
    }

    #[test]
    fn coerce_reads_leading_prefix_only() {
        assert_eq!(coerce_decimal("2kg"), dec!(2));
        assert_eq!(coerce_decimal("1.5 litros"), dec!(1.5));
    }

    #[test]
    fn coerce_accepts_bare_fraction_and_trailing_point() {
        assert_eq!(coerce_decimal(".5"), dec!(0.5));
        assert_eq!(coerce_decimal("7."), dec!(7));
    }

    #[test]
    fn coerce_empty_is_zero() {
        assert_eq!(coerce_decimal(""), Decimal::ZERO);
        assert_eq!(coerce_decimal("   "), Decimal::ZERO);
    }

    #[test]
    fn coerce_non_numeric_is_zero() {
        assert_eq!(coerce_decimal("abc"), Decimal::ZERO);
        assert_eq!(coerce_decimal("R$ 5"), Decimal::ZERO);
        assert_eq!(coerce_decimal("NaN"), Decimal::ZERO);
    }

    #[test]
    fn coerce_negative_is_zero() {
        assert_eq!(coerce_decimal("-3"), Decimal::ZERO);
        assert_eq!(coerce_decimal("-0,5"), Decimal::ZERO);
    }

    #[test]
    fn coerce_out_of_range_is_zero() {
        let huge = "9".repeat(40);
        assert_eq!(coerce_decimal(&huge), Decimal::ZERO);
    }

    #[test]
    fn coerce_reads_exponent() {
        assert_eq!(coerce_decimal("1e3"), dec!(1000));
        assert_eq!(coerce_decimal("2,5E-1"), dec!(0.25));
        assert_eq!(coerce_decimal("1.5e+2"), dec!(150));
    }

    #[test]
    fn coerce_incomplete_exponent_reads_mantissa() {
        assert_eq!(coerce_decimal("2e"), dec!(2));
        assert_eq!(coerce_decimal("3E+"), dec!(3));
    }

    #[test]
    fn coerce_huge_exponent_is_zero() {
        assert_eq!(coerce_decimal("1e400"), Decimal::ZERO);
        assert_eq!(coerce_decimal("1e99999999999"), Decimal::ZERO);
        assert_eq!(coerce_decimal("0e400"), Decimal::ZERO);
    }

    #[test]
    fn coerce_above_max_amount_is_zero() {
        assert_eq!(coerce_decimal("1000000000000"), MAX_AMOUNT);
        assert_eq!(coerce_decimal("1000000000000.01"), Decimal::ZERO);
        assert_eq!(coerce_decimal("99999999999999999999"), Decimal::ZERO);
    }

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    }

    #[test]
    fn clamp_keeps_values_in_range() {
        assert_eq!(clamp_amount(dec!(4.2)), dec!(4.2));
        assert_eq!(clamp_amount(dec!(-4.2)), Decimal::ZERO);
        assert_eq!(clamp_amount(Decimal::MAX), Decimal::ZERO);
    }
}
