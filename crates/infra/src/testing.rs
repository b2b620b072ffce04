//! Test doubles for the persistence boundary.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::persistence::{InMemoryAdapter, PersistenceAdapter, PersistenceError};

/// In-memory adapter whose writes and removes can be made to fail per key.
#[derive(Debug, Default)]
pub struct FlakyAdapter {
    inner: InMemoryAdapter,
    failing_writes: Mutex<HashSet<String>>,
    failing_removes: Mutex<HashSet<String>>,
}

impl FlakyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, key: &str, fail: bool) {
        toggle(&self.failing_writes, key, fail);
    }

    pub fn fail_removes(&self, key: &str, fail: bool) {
        toggle(&self.failing_removes, key, fail);
    }
}

fn toggle(set: &Mutex<HashSet<String>>, key: &str, on: bool) {
    let mut set = set.lock().unwrap();
    if on {
        set.insert(key.to_string());
    } else {
        set.remove(key);
    }
}

fn is_failing(set: &Mutex<HashSet<String>>, key: &str) -> bool {
    set.lock().unwrap().contains(key)
}

#[async_trait]
impl PersistenceAdapter for FlakyAdapter {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        if is_failing(&self.failing_writes, key) {
            return Err(PersistenceError::Write {
                key: key.to_string(),
                reason: "storage full".to_string(),
            });
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        if is_failing(&self.failing_removes, key) {
            return Err(PersistenceError::Remove {
                key: key.to_string(),
                reason: "storage unavailable".to_string(),
            });
        }
        self.inner.remove(key).await
    }
}
