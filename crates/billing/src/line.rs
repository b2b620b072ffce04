use serde::{Deserialize, Serialize};

use shopbill_core::decimal;
use shopbill_inventory::InventoryItem;

/// A priced, immutable record of a purchased inventory item.
///
/// Fields are private: a line is only ever created by pricing an inventory
/// item (or read back from storage) and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLineItem {
    item_name: String,
    item_quantity: String,
    metric: String,
    rate: String,
    /// `round2(quantity × rate)` fixed at pricing time.
    total_price: String,
}

impl BillLineItem {
    /// Price a line from its parts.
    pub fn new(
        item_name: impl Into<String>,
        item_quantity: impl Into<String>,
        metric: impl Into<String>,
        rate: impl Into<String>,
    ) -> Self {
        let item_quantity = item_quantity.into();
        let rate = rate.into();
        let total_price = decimal::line_total(Some(&item_quantity), Some(&rate));
        Self {
            item_name: item_name.into(),
            item_quantity,
            metric: metric.into(),
            rate,
            total_price,
        }
    }

    /// Price an inventory item. A missing rate is carried over as `"0"`.
    pub fn from_inventory(item: &InventoryItem) -> Self {
        Self::new(
            item.item_name.clone(),
            item.item_quantity.clone().unwrap_or_default(),
            item.metric.clone(),
            item.rate.clone().unwrap_or_else(|| "0".to_string()),
        )
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn item_quantity(&self) -> &str {
        &self.item_quantity
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn rate(&self) -> &str {
        &self.rate
    }

    pub fn total_price(&self) -> &str {
        &self.total_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopbill_core::ItemKey;

    fn inventory_item(quantity: Option<&str>, rate: Option<&str>) -> InventoryItem {
        InventoryItem {
            item_name: "Basmati Rice".to_string(),
            item_quantity: quantity.map(str::to_string),
            category: "Grocery".to_string(),
            metric: "kg".to_string(),
            rate: rate.map(str::to_string),
            created_at: ItemKey::new("2025-02-01T10:00:00.000Z"),
        }
    }

    #[test]
    fn prices_quantity_times_rate() {
        let line = BillLineItem::from_inventory(&inventory_item(Some("2.5"), Some("84.99")));
        assert_eq!(line.item_name(), "Basmati Rice");
        assert_eq!(line.item_quantity(), "2.5");
        assert_eq!(line.metric(), "kg");
        assert_eq!(line.rate(), "84.99");
        // 212.475 rounds half away from zero.
        assert_eq!(line.total_price(), "212.48");
    }

    #[test]
    fn missing_rate_prices_at_zero() {
        let line = BillLineItem::from_inventory(&inventory_item(Some("3"), None));
        assert_eq!(line.rate(), "0");
        assert_eq!(line.total_price(), "0.00");
    }

    #[test]
    fn total_is_not_recomputed_on_read() {
        // Stored lines keep whatever total they were priced with.
        let raw = r#"{"itemName":"Milk","itemQuantity":"2","metric":"litre","rate":"50","totalPrice":"99.00"}"#;
        let line: BillLineItem = serde_json::from_str(raw).unwrap();
        assert_eq!(line.total_price(), "99.00");
        assert_eq!(serde_json::to_string(&line).unwrap(), raw);
    }
}
