use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopbill_core::{DomainError, Entity, ItemKey, decimal};

use crate::schema::{Field, FieldValues, Normalized};

/// Item category (fixed vocabulary, in display order).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Grocery,
    Vegetables,
    Fruits,
    Meat,
    Dairy,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Grocery,
        Category::Vegetables,
        Category::Fruits,
        Category::Meat,
        Category::Dairy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Grocery => "Grocery",
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Meat => "Meat",
            Category::Dairy => "Dairy",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown category '{s}'")))
    }
}

/// Unit an item quantity is measured in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Kg,
    Oz,
    Dozen,
    Litre,
    Packet,
    Pieces,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Kg,
        Metric::Oz,
        Metric::Dozen,
        Metric::Litre,
        Metric::Packet,
        Metric::Pieces,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Kg => "kg",
            Metric::Oz => "oz",
            Metric::Dozen => "dozen",
            Metric::Litre => "litre",
            Metric::Packet => "packet",
            Metric::Pieces => "pieces",
        }
    }
}

impl core::fmt::Display for Metric {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown unit '{s}'")))
    }
}

/// An in-stock entry awaiting pricing/purchase.
///
/// Every field is kept as the string the user typed or picked so that an
/// in-progress (possibly invalid) edit can be held in memory. The persisted
/// form is a flat JSON object using the camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item_name: String,
    #[serde(default)]
    pub item_quantity: Option<String>,
    pub category: String,
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    /// Natural key: creation timestamp.
    pub created_at: ItemKey,
}

impl InventoryItem {
    /// Build an item from validated, normalized values.
    pub fn from_normalized(values: &Normalized, created_at: ItemKey) -> Self {
        let text = |field| values.get(field).unwrap_or_default().to_string();
        Self {
            item_name: text(Field::ItemName),
            item_quantity: values.get(Field::ItemQuantity).map(str::to_string),
            category: text(Field::Category),
            metric: text(Field::Metric),
            rate: values.get(Field::Rate).map(str::to_string),
            created_at,
        }
    }

    pub fn category_kind(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    pub fn metric_unit(&self) -> Option<Metric> {
        self.metric.parse().ok()
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.item_quantity.as_deref().and_then(decimal::parse)
    }

    pub fn rate_value(&self) -> Option<Decimal> {
        self.rate.as_deref().and_then(decimal::parse)
    }

    /// Price preview shown while editing: `round2(quantity × rate)`, zero when
    /// either side is missing.
    pub fn preview_total(&self) -> String {
        decimal::line_total(self.item_quantity.as_deref(), self.rate.as_deref())
    }

    /// Overwrite one field. Empty quantity/rate clear the optional value.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Category => self.category = value.unwrap_or_default(),
            Field::Metric => self.metric = value.unwrap_or_default(),
            Field::ItemName => self.item_name = value.unwrap_or_default(),
            Field::ItemQuantity => self.item_quantity = value.filter(|v| !v.is_empty()),
            Field::Rate => self.rate = value.filter(|v| !v.is_empty()),
        }
    }
}

impl FieldValues for InventoryItem {
    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Category => Some(&self.category),
            Field::Metric => Some(&self.metric),
            Field::ItemName => Some(&self.item_name),
            Field::ItemQuantity => self.item_quantity.as_deref(),
            Field::Rate => self.rate.as_deref(),
        }
    }
}

impl Entity for InventoryItem {
    type Id = ItemKey;

    fn id(&self) -> &Self::Id {
        &self.created_at
    }
}

/// Form submission for a new inventory item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub item_name: String,
    #[serde(default)]
    pub item_quantity: Option<String>,
    pub category: String,
    pub metric: String,
    #[serde(default)]
    pub rate: Option<String>,
    /// Left empty the store assigns a fresh key.
    #[serde(default)]
    pub created_at: Option<ItemKey>,
}

impl NewItem {
    pub fn new(
        category: impl Into<String>,
        item_name: impl Into<String>,
        item_quantity: impl Into<String>,
        metric: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            item_quantity: Some(item_quantity.into()),
            category: category.into(),
            metric: metric.into(),
            rate: None,
            created_at: None,
        }
    }

    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    pub fn with_created_at(mut self, key: ItemKey) -> Self {
        self.created_at = Some(key);
        self
    }
}

impl FieldValues for NewItem {
    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Category => Some(&self.category),
            Field::Metric => Some(&self.metric),
            Field::ItemName => Some(&self.item_name),
            Field::ItemQuantity => self.item_quantity.as_deref(),
            Field::Rate => self.rate.as_deref(),
        }
    }
}
