//! Whole-collection persistence boundary.
//!
//! Stores keep each collection as one serialized snapshot under a string key.
//! Adapters only move opaque strings; the JSON codec lives in [`codec`].

pub mod codec;
pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileAdapter;
pub use in_memory::InMemoryAdapter;
pub use r#trait::{PersistenceAdapter, PersistenceError, SharedAdapter};
