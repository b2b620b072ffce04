use tokio::sync::Mutex;

use shopbill_billing::{BillLineItem, BillSnapshot, grand_total};

use crate::persistence::{PersistenceAdapter, PersistenceError, codec};

use super::StoreError;

/// Owner of the bill collection (insertion order).
///
/// Lines arrive already validated and priced; nothing is checked here.
pub struct BillStore<A> {
    adapter: A,
    key: String,
    lines: Mutex<Vec<BillLineItem>>,
}

impl<A> BillStore<A>
where
    A: PersistenceAdapter,
{
    pub async fn open(adapter: A, key: impl Into<String>) -> Result<Self, PersistenceError> {
        let key = key.into();
        let lines: Vec<BillLineItem> = codec::load(&adapter, &key).await?;

        tracing::info!(key = %key, count = lines.len(), "bill loaded");

        Ok(Self {
            adapter,
            key,
            lines: Mutex::new(lines),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn list(&self) -> Vec<BillLineItem> {
        self.lines.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.lines.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lines.lock().await.is_empty()
    }

    /// Running total of the bill.
    pub async fn grand_total(&self) -> String {
        grand_total(self.lines.lock().await.iter())
    }

    /// Consistent copy of the bill for export.
    pub async fn snapshot(&self) -> BillSnapshot {
        BillSnapshot::capture(self.list().await)
    }

    /// Add a line and save. If the save fails the line stays in memory.
    ///
    /// Returns the index of the new line.
    pub async fn append(&self, line: BillLineItem) -> Result<usize, StoreError> {
        let mut lines = self.lines.lock().await;
        lines.push(line);
        let index = lines.len() - 1;

        self.persist(&lines).await?;
        tracing::info!(key = %self.key, index, "bill line appended");
        Ok(index)
    }

    /// Add a line only if the extended bill can be saved first.
    ///
    /// On failure neither memory nor storage changes.
    pub async fn append_durable(&self, line: BillLineItem) -> Result<usize, StoreError> {
        let mut lines = self.lines.lock().await;

        let mut next = Vec::with_capacity(lines.len() + 1);
        next.extend(lines.iter().cloned());
        next.push(line);

        self.persist(&next).await?;
        *lines = next;

        let index = lines.len() - 1;
        tracing::info!(key = %self.key, index, "bill line appended");
        Ok(index)
    }

    /// Remove the line at `index`. Out of range is a no-op returning `None`.
    pub async fn remove_at(&self, index: usize) -> Result<Option<BillLineItem>, StoreError> {
        let mut lines = self.lines.lock().await;
        if index >= lines.len() {
            tracing::debug!(key = %self.key, index, "remove of missing bill line ignored");
            return Ok(None);
        }

        let removed = lines.remove(index);
        self.persist(&lines).await?;
        tracing::info!(key = %self.key, index, "bill line removed");
        Ok(Some(removed))
    }

    /// Empty the bill and drop its stored collection. Returns the number of
    /// lines removed.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let mut lines = self.lines.lock().await;
        let removed = lines.len();
        lines.clear();

        self.adapter.remove(&self.key).await.inspect_err(|err| {
            tracing::warn!(key = %self.key, error = %err, "bill clear not saved; in-memory bill is empty");
        })?;
        tracing::info!(key = %self.key, removed, "bill cleared");
        Ok(removed)
    }

    /// Save the current bill again (retry after a failed write).
    pub async fn flush(&self) -> Result<(), StoreError> {
        let lines = self.lines.lock().await;
        self.persist(&lines).await?;
        Ok(())
    }

    async fn persist(&self, lines: &[BillLineItem]) -> Result<(), PersistenceError> {
        codec::save(&self.adapter, &self.key, lines)
            .await
            .inspect_err(|err| {
                tracing::warn!(key = %self.key, error = %err, "bill write failed");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::persistence::InMemoryAdapter;
    use crate::testing::FlakyAdapter;

    fn line(name: &str, quantity: &str, rate: &str) -> BillLineItem {
        BillLineItem::new(name, quantity, "kg", rate)
    }

    async fn store() -> (Arc<InMemoryAdapter>, BillStore<Arc<InMemoryAdapter>>) {
        let adapter = Arc::new(InMemoryAdapter::new());
        let store = BillStore::open(adapter.clone(), "billItems").await.unwrap();
        (adapter, store)
    }

    async fn persisted<A: PersistenceAdapter>(adapter: &A) -> Vec<BillLineItem> {
        codec::load(adapter, "billItems").await.unwrap()
    }

    #[tokio::test]
    async fn append_keeps_insertion_order() {
        let (adapter, store) = store().await;
        assert_eq!(store.append(line("Onion", "2", "30")).await.unwrap(), 0);
        assert_eq!(store.append(line("Garlic", "0.25", "200")).await.unwrap(), 1);

        let names: Vec<String> = store
            .list()
            .await
            .iter()
            .map(|l| l.item_name().to_string())
            .collect();
        assert_eq!(names, ["Onion", "Garlic"]);
        assert_eq!(persisted(&adapter).await, store.list().await);
        assert_eq!(store.grand_total().await, "110.00");
    }

    #[tokio::test]
    async fn remove_at_out_of_range_is_a_no_op() {
        let (_adapter, store) = store().await;
        store.append(line("Onion", "2", "30")).await.unwrap();

        assert_eq!(store.remove_at(5).await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_at_deletes_one_line() {
        let (adapter, store) = store().await;
        store.append(line("Onion", "2", "30")).await.unwrap();
        store.append(line("Garlic", "1", "200")).await.unwrap();
        store.append(line("Ginger", "1", "150")).await.unwrap();

        let removed = store.remove_at(1).await.unwrap().unwrap();
        assert_eq!(removed.item_name(), "Garlic");

        let saved = persisted(&adapter).await;
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].item_name(), "Ginger");
    }

    #[tokio::test]
    async fn clear_drops_the_stored_collection() {
        let (adapter, store) = store().await;
        store.append(line("Onion", "2", "30")).await.unwrap();
        store.append(line("Garlic", "1", "200")).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.is_empty().await);
        assert_eq!(adapter.get("billItems").await.unwrap(), None);
        assert_eq!(store.grand_total().await, "0.00");
    }

    #[tokio::test]
    async fn reopen_restores_lines() {
        let (adapter, store) = store().await;
        store.append(line("Onion", "2", "30")).await.unwrap();
        store.append(line("Garlic", "1", "200")).await.unwrap();
        let before = store.list().await;

        let reopened = BillStore::open(adapter, "billItems").await.unwrap();
        assert_eq!(reopened.list().await, before);
    }

    #[tokio::test]
    async fn snapshot_matches_store() {
        let (_adapter, store) = store().await;
        store.append(line("Onion", "2", "30")).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.lines(), store.list().await.as_slice());
        assert_eq!(snapshot.grand_total(), "60.00");
    }

    #[tokio::test]
    async fn append_keeps_line_in_memory_when_write_fails() {
        let adapter = Arc::new(FlakyAdapter::new());
        let store = BillStore::open(adapter.clone(), "billItems").await.unwrap();

        adapter.fail_writes("billItems", true);
        let err = store.append(line("Onion", "2", "30")).await.unwrap_err();
        assert!(err.is_applied());
        assert_eq!(store.len().await, 1);

        adapter.fail_writes("billItems", false);
        store.flush().await.unwrap();
        assert_eq!(persisted(&adapter).await.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_memory_when_remove_fails_and_can_be_retried() {
        let adapter = Arc::new(FlakyAdapter::new());
        let store = BillStore::open(adapter.clone(), "billItems").await.unwrap();
        store.append(line("Onion", "2", "30")).await.unwrap();

        adapter.fail_removes("billItems", true);
        let err = store.clear().await.unwrap_err();
        assert!(err.is_applied());
        assert!(store.is_empty().await);
        assert_eq!(persisted(&adapter).await.len(), 1);

        adapter.fail_removes("billItems", false);
        assert_eq!(store.clear().await.unwrap(), 0);
        assert_eq!(adapter.get("billItems").await.unwrap(), None);
    }

    #[tokio::test]
    async fn append_durable_changes_nothing_when_write_fails() {
        let adapter = Arc::new(FlakyAdapter::new());
        let store = BillStore::open(adapter.clone(), "billItems").await.unwrap();
        store.append_durable(line("Onion", "2", "30")).await.unwrap();

        adapter.fail_writes("billItems", true);
        assert!(store.append_durable(line("Garlic", "1", "200")).await.is_err());
        assert_eq!(store.len().await, 1);

        adapter.fail_writes("billItems", false);
        assert_eq!(persisted(&adapter).await.len(), 1);
    }
}
