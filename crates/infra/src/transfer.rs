//! Moving an inventory item onto the bill ("buy").
//!
//! A transfer validates the full record, writes the priced line to the bill
//! and only then removes the item from the inventory. The bill write happens
//! first so a crash between the two steps can leave an item billed but still
//! listed, never an item gone from both.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use shopbill_billing::BillLineItem;
use shopbill_core::{Entity, ItemKey};
use shopbill_inventory::{InventoryItem, ValidationErrors, ValidationMode, validate_record};

use crate::persistence::PersistenceAdapter;
use crate::stores::{BillStore, InventoryStore, StoreError};

/// Transfer failure.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The item is not ready for billing; neither store changed.
    #[error("item {key} cannot be billed: {errors}")]
    Validation {
        key: ItemKey,
        errors: ValidationErrors,
    },

    /// No live inventory item has this key (already billed or removed).
    #[error("item {0} is not in the inventory")]
    NotInInventory(ItemKey),

    /// The item was edited after the caller's copy was taken; neither store
    /// changed. Retry with the current item.
    #[error("item {0} changed since it was read")]
    Stale(ItemKey),

    /// The bill could not be saved; the item is still in the inventory.
    #[error("failed to add item {key} to the bill")]
    BillAppend {
        key: ItemKey,
        #[source]
        source: StoreError,
    },

    /// The line is billed but the inventory removal was not saved.
    ///
    /// Call [`TransferService::retry_removal`]; never transfer the item again.
    #[error("item {key} was billed but its inventory removal was not saved")]
    RemovalPending {
        key: ItemKey,
        line: BillLineItem,
        #[source]
        source: StoreError,
    },
}

impl TransferError {
    pub fn key(&self) -> &ItemKey {
        match self {
            TransferError::Validation { key, .. }
            | TransferError::BillAppend { key, .. }
            | TransferError::RemovalPending { key, .. } => key,
            TransferError::NotInInventory(key) | TransferError::Stale(key) => key,
        }
    }
}

pub struct TransferService<A> {
    inventory: Arc<InventoryStore<A>>,
    bill: Arc<BillStore<A>>,
    gate: Mutex<()>,
}

impl<A> TransferService<A>
where
    A: PersistenceAdapter,
{
    pub fn new(inventory: Arc<InventoryStore<A>>, bill: Arc<BillStore<A>>) -> Self {
        Self {
            inventory,
            bill,
            gate: Mutex::new(()),
        }
    }

    pub fn inventory(&self) -> &Arc<InventoryStore<A>> {
        &self.inventory
    }

    pub fn bill(&self) -> &Arc<BillStore<A>> {
        &self.bill
    }

    /// Bill `item` and remove it from the inventory.
    ///
    /// `item` must match the live inventory entry exactly, so the line always
    /// prices what the store holds.
    pub async fn transfer(&self, item: &InventoryItem) -> Result<BillLineItem, TransferError> {
        let _turn = self.gate.lock().await;
        let key = item.id().clone();

        let values = validate_record(item, ValidationMode::Transfer).map_err(|errors| {
            tracing::debug!(created_at = %key, %errors, "transfer rejected");
            TransferError::Validation {
                key: key.clone(),
                errors,
            }
        })?;

        match self.inventory.get(&key).await {
            None => {
                tracing::warn!(created_at = %key, "transfer of item not in inventory");
                return Err(TransferError::NotInInventory(key));
            }
            Some(live) if live != *item => {
                tracing::warn!(created_at = %key, "transfer of outdated item copy");
                return Err(TransferError::Stale(key));
            }
            Some(_) => {}
        }

        let line = BillLineItem::from_inventory(&InventoryItem::from_normalized(&values, key.clone()));

        if let Err(source) = self.bill.append_durable(line.clone()).await {
            tracing::error!(created_at = %key, error = %source, "bill write failed; item left in inventory");
            return Err(TransferError::BillAppend { key, source });
        }

        if let Err(source) = self.inventory.remove(&key).await {
            tracing::error!(created_at = %key, error = %source, "item billed but inventory removal not saved");
            return Err(TransferError::RemovalPending { key, line, source });
        }

        tracing::info!(
            created_at = %key,
            item = line.item_name(),
            total = line.total_price(),
            "item transferred to bill"
        );
        Ok(line)
    }

    /// Bill the live item stored under `key` in its current state.
    pub async fn transfer_key(&self, key: &ItemKey) -> Result<BillLineItem, TransferError> {
        let Some(item) = self.inventory.get(key).await else {
            return Err(TransferError::NotInInventory(key.clone()));
        };
        self.transfer(&item).await
    }

    /// Finish a transfer that failed with [`TransferError::RemovalPending`].
    ///
    /// Only touches the inventory; the bill is never appended again.
    pub async fn retry_removal(&self, key: &ItemKey) -> Result<(), StoreError> {
        let _turn = self.gate.lock().await;

        if !self.inventory.remove(key).await? {
            // Already gone from memory; the earlier failure was the write.
            self.inventory.flush().await?;
        }
        tracing::info!(created_at = %key, "pending inventory removal saved");
        Ok(())
    }
}
