//! Inventory domain module.
//!
//! This crate contains the business rules for in-stock items, implemented purely
//! as deterministic domain logic (no IO, no storage):
//! - the item record and its fixed category/unit vocabularies,
//! - the validation schema gating every mutation,
//! - grouping of items into per-category sections.

pub mod grouping;
pub mod item;
pub mod schema;

pub use grouping::{CategoryBucket, group_by_category};
pub use item::{Category, InventoryItem, Metric, NewItem};
pub use schema::{
    Field, FieldError, FieldValues, Normalized, ValidationErrors, ValidationMode,
    normalize_name, validate_field, validate_record,
};
