use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::r#trait::{PersistenceAdapter, PersistenceError};

/// In-memory adapter.
///
/// Intended for tests/dev; contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceAdapter for InMemoryAdapter {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.read().map_err(|_| PersistenceError::Read {
            key: key.to_string(),
            reason: "lock poisoned".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let mut entries = self.entries.write().map_err(|_| PersistenceError::Write {
            key: key.to_string(),
            reason: "lock poisoned".to_string(),
        })?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.write().map_err(|_| PersistenceError::Remove {
            key: key.to_string(),
            reason: "lock poisoned".to_string(),
        })?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_set_remove() {
        let adapter = InMemoryAdapter::new();
        assert_eq!(adapter.get("items").await.unwrap(), None);

        adapter.set("items", "[]".to_string()).await.unwrap();
        assert_eq!(adapter.get("items").await.unwrap().as_deref(), Some("[]"));

        adapter.remove("items").await.unwrap();
        adapter.remove("items").await.unwrap();
        assert_eq!(adapter.get("items").await.unwrap(), None);
    }
}
