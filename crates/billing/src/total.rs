use rust_decimal::Decimal;

use shopbill_core::decimal;

use crate::line::BillLineItem;

/// Exact sum of line totals. Unparseable totals count as zero, and so does a
/// line whose total would overflow the running sum.
pub fn grand_total_value<'a, I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = &'a BillLineItem>,
{
    lines.into_iter().fold(Decimal::ZERO, |sum, line| {
        let total = decimal::parse_or_zero(Some(line.total_price()));
        sum.checked_add(total).unwrap_or(sum)
    })
}

/// Sum of line totals with exactly two decimals (`"0.00"` for an empty bill).
pub fn grand_total<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a BillLineItem>,
{
    decimal::format2(grand_total_value(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn priced(total: &str) -> BillLineItem {
        serde_json::from_value(serde_json::json!({
            "itemName": "Item",
            "itemQuantity": "1",
            "metric": "pieces",
            "rate": total,
            "totalPrice": total,
        }))
        .unwrap()
    }

    #[test]
    fn empty_bill_totals_zero() {
        assert_eq!(grand_total(&Vec::<BillLineItem>::new()), "0.00");
    }

    #[test]
    fn sums_line_totals() {
        let lines = vec![priced("10.00"), priced("5.50")];
        assert_eq!(grand_total(&lines), "15.50");
    }

    #[test]
    fn garbage_totals_count_as_zero() {
        let lines = vec![priced("12.25"), priced("n/a")];
        assert_eq!(grand_total(&lines), "12.25");
    }

    #[test]
    fn overflowing_totals_count_as_zero() {
        let max = Decimal::MAX.to_string();
        let lines = vec![priced("10.00"), priced(&max), priced("5.50")];
        assert_eq!(grand_total_value(&lines), Decimal::new(1550, 2));
        assert_eq!(grand_total(&lines), "15.50");

        let lines = vec![priced(&max), priced("1")];
        assert_eq!(grand_total_value(&lines), Decimal::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the grand total equals the integer sum of line cents.
        #[test]
        fn grand_total_is_exact(cents in prop::collection::vec(0i64..10_000_000_000i64, 0..50)) {
            let lines: Vec<BillLineItem> = cents
                .iter()
                .map(|c| priced(&format!("{}.{:02}", c / 100, c % 100)))
                .collect();

            let sum: i64 = cents.iter().sum();
            let expected = format!("{}.{:02}", sum / 100, sum % 100);
            prop_assert_eq!(grand_total(&lines), expected);
        }
    }
}
