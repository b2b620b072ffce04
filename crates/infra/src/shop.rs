//! Wiring of the stores and the transfer service over one backend.

use std::sync::Arc;

use shopbill_billing::BillSnapshot;
use shopbill_inventory::{Category, CategoryBucket, InventoryItem, group_by_category};

use crate::config::StorageConfig;
use crate::persistence::{PersistenceError, SharedAdapter};
use crate::stores::{BillStore, InventoryStore};
use crate::transfer::TransferService;

/// Inventory, bill and transfer service sharing one adapter.
pub struct Shop {
    inventory: Arc<InventoryStore<SharedAdapter>>,
    bill: Arc<BillStore<SharedAdapter>>,
    transfer: TransferService<SharedAdapter>,
}

impl Shop {
    pub async fn open(storage: &StorageConfig) -> Result<Self, PersistenceError> {
        Self::open_with(storage.adapter(), storage).await
    }

    pub async fn open_with(
        adapter: SharedAdapter,
        storage: &StorageConfig,
    ) -> Result<Self, PersistenceError> {
        let inventory = Arc::new(InventoryStore::open(adapter.clone(), &storage.inventory_key).await?);
        let bill = Arc::new(BillStore::open(adapter, &storage.bill_key).await?);
        let transfer = TransferService::new(inventory.clone(), bill.clone());

        Ok(Self {
            inventory,
            bill,
            transfer,
        })
    }

    pub fn inventory(&self) -> &InventoryStore<SharedAdapter> {
        &self.inventory
    }

    pub fn bill(&self) -> &BillStore<SharedAdapter> {
        &self.bill
    }

    pub fn transfer(&self) -> &TransferService<SharedAdapter> {
        &self.transfer
    }

    /// Current inventory grouped into category sections, every category
    /// included.
    pub async fn sections(&self) -> Vec<(Category, Vec<InventoryItem>)> {
        let items = self.inventory.list().await;
        group_by_category(&items)
            .into_iter()
            .map(|CategoryBucket { category, items }| {
                (category, items.into_iter().cloned().collect())
            })
            .collect()
    }

    /// Bill handed to document export.
    pub async fn bill_snapshot(&self) -> BillSnapshot {
        self.bill.snapshot().await
    }
}
