//! Exact decimal money arithmetic.
//!
//! Binary floating point accumulates visible drift across thousands of small
//! transactions, so every monetary value in this crate is a [`rust_decimal::Decimal`]
//! (28-29 significant digits). All persisted totals are rounded to
//! [`MONEY_SCALE`] decimal places with half-up rounding before storage; inputs
//! arriving from the outside world are coerced through [`parse_amount`] so that
//! null or unparsable values degrade to zero instead of poisoning a sum.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Number of decimal places persisted for every monetary amount.
pub const MONEY_SCALE: u32 = 3;

/// Coerces an optional textual amount into a `Decimal`.
///
/// `None`, blank, or unparsable input becomes `Decimal::ZERO` with a logged
/// warning; callers that need a different default can substitute afterwards.
pub fn parse_amount(raw: Option<&str>) -> Decimal {
    match raw {
        None => Decimal::ZERO,
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Decimal::ZERO;
            }
            trimmed.parse::<Decimal>().unwrap_or_else(|_| {
                warn!(input = %text, "unparsable monetary input, defaulting to 0");
                Decimal::ZERO
            })
        }
    }
}

/// Coerces a binary float into a `Decimal`, defaulting to zero when the value
/// is not representable (NaN, infinities).
pub fn from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        warn!(input = value, "non-finite monetary input, defaulting to 0");
        Decimal::ZERO
    })
}

/// Rounds a monetary value to [`MONEY_SCALE`] places, half-up.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Line total for a requisition row: `round(quantity * unit_price, 3)`.
#[must_use]
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_money(quantity * unit_price)
}

/// Division with an explicit default when the divisor is zero.
#[must_use]
pub fn div_or(numerator: Decimal, divisor: Decimal, default: Decimal) -> Decimal {
    if divisor.is_zero() {
        default
    } else {
        numerator / divisor
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_amount_handles_garbage() {
        assert_eq!(parse_amount(None), Decimal::ZERO);
        assert_eq!(parse_amount(Some("")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("   ")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("not-a-number")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("10.555")), dec("10.555"));
        assert_eq!(parse_amount(Some(" 42 ")), dec("42"));
        assert_eq!(parse_amount(Some("-3.25")), dec("-3.25"));
    }

    #[test]
    fn test_from_f64_non_finite_defaults() {
        assert_eq!(from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(from_f64(f64::INFINITY), Decimal::ZERO);
        assert_eq!(from_f64(12.5), dec("12.5"));
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec("1.0005")), dec("1.001"));
        assert_eq!(round_money(dec("1.0004")), dec("1.000"));
        assert_eq!(round_money(dec("-1.0005")), dec("-1.001"));
        assert_eq!(round_money(dec("31.665")), dec("31.665"));
    }

    #[test]
    fn test_line_total_matches_storage_rounding() {
        // 3 x 10.555 = 31.665 exactly at three places
        assert_eq!(line_total(dec("3"), dec("10.555")), dec("31.665"));
        // 2 x 7.333 = 14.666, 3 x 7.333 = 21.999, 5 x 7.333 = 36.665
        assert_eq!(line_total(dec("2"), dec("7.333")), dec("14.666"));
        assert_eq!(line_total(dec("3"), dec("7.333")), dec("21.999"));
        assert_eq!(line_total(dec("5"), dec("7.333")), dec("36.665"));
        // a quantity that forces actual rounding
        assert_eq!(line_total(dec("1.5"), dec("0.333")), dec("0.500"));
    }

    #[test]
    fn test_div_or_zero_divisor() {
        assert_eq!(div_or(dec("10"), Decimal::ZERO, dec("7")), dec("7"));
        assert_eq!(div_or(dec("10"), dec("4"), Decimal::ZERO), dec("2.5"));
    }

    #[test]
    fn test_no_binary_drift_over_many_additions() {
        // 0.1 added a thousand times is exactly 100 in decimal arithmetic.
        let step = dec("0.1");
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += step;
        }
        assert_eq!(total, dec("100"));
    }
}
