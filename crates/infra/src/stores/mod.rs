//! Stateful stores owning the inventory and bill collections.
//!
//! Each store keeps its collection in memory and writes the whole collection
//! through a [`PersistenceAdapter`](crate::persistence::PersistenceAdapter)
//! after every accepted mutation. A store-wide async mutex is held for the
//! whole operation, write included, so writes to one key queue in order.

pub mod bill;
pub mod inventory;

pub use bill::BillStore;
pub use inventory::{InventoryStore, UpdateOutcome};

use thiserror::Error;

use shopbill_core::DomainError;
use shopbill_inventory::ValidationErrors;

use crate::persistence::PersistenceError;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record was rejected; nothing changed.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The mutation would break a store invariant; nothing changed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The in-memory mutation was applied but could not be saved.
    ///
    /// Recoverable: call `flush()` (or repeat the operation) to retry.
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    /// True when the in-memory state already reflects the operation.
    pub fn is_applied(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}
