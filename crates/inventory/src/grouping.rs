//! Per-category sections of the inventory list.

use crate::item::{Category, InventoryItem};

/// Items of one category, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket<'a> {
    pub category: Category,
    pub items: Vec<&'a InventoryItem>,
}

impl CategoryBucket<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Partition items into one bucket per category, in [`Category::ALL`] order.
///
/// Every category gets a bucket, empty ones included, so sections render in a
/// stable layout. Items whose category string is not a known member land in
/// no bucket.
pub fn group_by_category<'a, I>(items: I) -> Vec<CategoryBucket<'a>>
where
    I: IntoIterator<Item = &'a InventoryItem>,
{
    let mut buckets: Vec<CategoryBucket<'a>> = Category::ALL
        .into_iter()
        .map(|category| CategoryBucket {
            category,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        if let Some(category) = item.category_kind() {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.category == category) {
                bucket.items.push(item);
            }
        }
    }

    buckets
}
