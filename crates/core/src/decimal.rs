//! Exact decimal helpers for quantities, rates and prices.
//!
//! All amounts travel as strings (`"12.50"`) so their formatting survives a
//! round trip through storage. Arithmetic is done on [`Decimal`], never on
//! floats.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a decimal string (surrounding whitespace ignored).
pub fn parse(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Parse an optional decimal string, treating absent or malformed input as zero.
pub fn parse_or_zero(value: Option<&str>) -> Decimal {
    value.and_then(parse).unwrap_or(Decimal::ZERO)
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render with exactly two decimal places (`5.5` → `"5.50"`).
pub fn format2(value: Decimal) -> String {
    let mut rounded = round2(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// `round2(quantity × rate)` rendered as a two-decimal string.
///
/// Absent or malformed operands count as zero.
pub fn line_total(quantity: Option<&str>, rate: Option<&str>) -> String {
    let product = parse_or_zero(quantity)
        .checked_mul(parse_or_zero(rate))
        // Overflow needs operands far outside the validated bounds.
        .unwrap_or(Decimal::ZERO);
    format2(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn format2_pads_and_rounds() {
        assert_eq!(format2(Decimal::from_str("5.5").unwrap()), "5.50");
        assert_eq!(format2(Decimal::from_str("10").unwrap()), "10.00");
        assert_eq!(format2(Decimal::from_str("2.345").unwrap()), "2.35");
        assert_eq!(format2(Decimal::from_str("2.344").unwrap()), "2.34");
        assert_eq!(format2(Decimal::ZERO), "0.00");
    }

    #[test]
    fn line_total_multiplies_exactly() {
        assert_eq!(line_total(Some("1.5"), Some("40")), "60.00");
        assert_eq!(line_total(Some("0.33"), Some("0.33")), "0.11");
        assert_eq!(line_total(Some("999.99"), Some("99999.99")), "99998990.00");
    }

    #[test]
    fn line_total_treats_missing_operands_as_zero() {
        assert_eq!(line_total(None, Some("12.00")), "0.00");
        assert_eq!(line_total(Some("3"), None), "0.00");
        assert_eq!(line_total(Some("abc"), Some("2")), "0.00");
    }

    #[test]
    fn parse_ignores_surrounding_whitespace() {
        assert_eq!(parse(" 4.25 "), Some(Decimal::from_str("4.25").unwrap()));
        assert_eq!(parse("   "), None);
        assert_eq!(parse(""), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: two-decimal inputs multiply to the exact cent value.
        #[test]
        fn line_total_matches_integer_cent_arithmetic(
            qty_cents in 1i64..=99_999i64,
            rate_cents in 0i64..=9_999_999i64,
        ) {
            let qty = Decimal::new(qty_cents, 2);
            let rate = Decimal::new(rate_cents, 2);
            let total = line_total(Some(&qty.to_string()), Some(&rate.to_string()));

            // qty * rate has 4 decimals; round half away from zero to 2.
            let raw = qty_cents as i128 * rate_cents as i128;
            let cents = (raw + 50) / 100;
            let expected = format!("{}.{:02}", cents / 100, cents % 100);
            prop_assert_eq!(total, expected);
        }
    }
}
