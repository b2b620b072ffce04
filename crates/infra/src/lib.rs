//! Infrastructure layer: persistence, stores, transfer service, config.

pub mod config;
pub mod persistence;
pub mod shop;
pub mod stores;
pub mod transfer;

#[cfg(test)]
mod testing;


pub use config::{ConfigError, ShopConfig, StorageConfig};
pub use shop::Shop;
pub use stores::{BillStore, InventoryStore, StoreError, UpdateOutcome};
pub use transfer::{TransferError, TransferService};
