use std::cmp::Ordering;

use tokio::sync::Mutex;

use shopbill_core::{DomainError, Entity, ItemKey, KeyClock};
use shopbill_inventory::{
    Field, InventoryItem, NewItem, ValidationErrors, ValidationMode, validate_field,
    validate_record,
};

use crate::persistence::{PersistenceAdapter, PersistenceError, codec};

use super::StoreError;

/// Result of a field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The item is error-free and the collection was saved.
    Saved,
    /// Applied in memory only; these fields still need fixing before the item
    /// is saved again.
    Pending(ValidationErrors),
    /// No live item has this key; nothing happened.
    Missing,
}

/// One live item.
///
/// `current` is what the user sees (possibly mid-edit and invalid);
/// `committed` is the last error-free state and is what gets persisted.
#[derive(Debug, Clone)]
struct Entry {
    current: InventoryItem,
    committed: InventoryItem,
    errors: ValidationErrors,
}

impl Entry {
    fn new(item: InventoryItem) -> Self {
        Self {
            current: item.clone(),
            committed: item,
            errors: ValidationErrors::new(),
        }
    }
}

/// Newest `createdAt` first; keys that are not timestamps sort last.
fn newest_first(a: &InventoryItem, b: &InventoryItem) -> Ordering {
    b.created_at
        .timestamp()
        .ok()
        .cmp(&a.created_at.timestamp().ok())
}

/// Owner of the inventory collection.
pub struct InventoryStore<A> {
    adapter: A,
    key: String,
    clock: KeyClock,
    entries: Mutex<Vec<Entry>>,
}

impl<A> InventoryStore<A>
where
    A: PersistenceAdapter,
{
    /// Load the collection stored under `key` (absent key → empty inventory).
    pub async fn open(adapter: A, key: impl Into<String>) -> Result<Self, PersistenceError> {
        let key = key.into();
        let mut items: Vec<InventoryItem> = codec::load(&adapter, &key).await?;
        items.sort_by(newest_first);

        tracing::info!(key = %key, count = items.len(), "inventory loaded");

        Ok(Self {
            adapter,
            key,
            clock: KeyClock::new(),
            entries: Mutex::new(items.into_iter().map(Entry::new).collect()),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current items, newest first.
    pub async fn list(&self) -> Vec<InventoryItem> {
        let entries = self.entries.lock().await;
        entries.iter().map(|e| e.current.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn get(&self, key: &ItemKey) -> Option<InventoryItem> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .find(|e| e.current.is(key))
            .map(|e| e.current.clone())
    }

    /// Outstanding field errors of an item (empty when valid or absent).
    pub async fn field_errors(&self, key: &ItemKey) -> ValidationErrors {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .find(|e| e.current.is(key))
            .map(|e| e.errors.clone())
            .unwrap_or_default()
    }

    /// Validate and insert a new item, then save the collection.
    ///
    /// A rejected draft leaves the store untouched. The item keeps the
    /// draft's `createdAt` when one is given, which must be a timestamp not
    /// belonging to a live item. Generated keys skip over live ones.
    pub async fn add(&self, draft: NewItem) -> Result<InventoryItem, StoreError> {
        let values = validate_record(&draft, ValidationMode::Create)?;

        let mut entries = self.entries.lock().await;

        let created_at = match draft.created_at {
            Some(key) => {
                key.timestamp()?;
                if entries.iter().any(|e| e.current.is(&key)) {
                    return Err(DomainError::conflict(format!("item {key} already exists")).into());
                }
                key
            }
            None => loop {
                // Explicit or loaded keys may sit ahead of the clock.
                let key = self.clock.next();
                if !entries.iter().any(|e| e.current.is(&key)) {
                    break key;
                }
            },
        };

        let item = InventoryItem::from_normalized(&values, created_at);
        let pos = entries.partition_point(|e| newest_first(&e.current, &item) != Ordering::Greater);
        entries.insert(pos, Entry::new(item.clone()));

        self.persist(&entries).await?;
        tracing::info!(key = %self.key, created_at = %item.created_at, "inventory item added");
        Ok(item)
    }

    /// Set one field of a live item.
    ///
    /// The value is always applied in memory: normalized when it passes field
    /// validation, verbatim otherwise. The collection is saved only once the
    /// item has no outstanding field errors.
    pub async fn update(
        &self,
        key: &ItemKey,
        field: Field,
        value: &str,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut entries = self.entries.lock().await;

        let Some(entry) = entries.iter_mut().find(|e| e.current.is(key)) else {
            tracing::debug!(key = %self.key, created_at = %key, %field, "update of missing item ignored");
            return Ok(UpdateOutcome::Missing);
        };

        match validate_field(field, Some(value), ValidationMode::Editing) {
            Ok(normalized) => {
                entry.current.set(field, normalized);
                entry.errors.clear(field);
            }
            Err(e) => {
                entry.current.set(field, Some(value.to_string()));
                entry.errors.insert(e);
            }
        }

        if !entry.errors.is_empty() {
            return Ok(UpdateOutcome::Pending(entry.errors.clone()));
        }

        entry.committed = entry.current.clone();
        self.persist(&entries).await?;
        tracing::debug!(key = %self.key, created_at = %key, %field, "inventory item updated");
        Ok(UpdateOutcome::Saved)
    }

    /// Delete a live item. Returns `false` (and writes nothing) when absent.
    pub async fn remove(&self, key: &ItemKey) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;

        let Some(pos) = entries.iter().position(|e| e.current.is(key)) else {
            tracing::debug!(key = %self.key, created_at = %key, "remove of missing item ignored");
            return Ok(false);
        };

        entries.remove(pos);
        self.persist(&entries).await?;
        tracing::info!(key = %self.key, created_at = %key, "inventory item removed");
        Ok(true)
    }

    /// Save the committed collection again (retry after a failed write).
    pub async fn flush(&self) -> Result<(), StoreError> {
        let entries = self.entries.lock().await;
        self.persist(&entries).await?;
        Ok(())
    }

    async fn persist(&self, entries: &[Entry]) -> Result<(), PersistenceError> {
        let snapshot: Vec<InventoryItem> = entries.iter().map(|e| e.committed.clone()).collect();
        codec::save(&self.adapter, &self.key, &snapshot)
            .await
            .inspect_err(|err| {
                tracing::warn!(key = %self.key, error = %err, "inventory write failed; in-memory state kept");
            })
    }
}
