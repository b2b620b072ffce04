use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Persistence operation error.
///
/// Every variant names the collection key involved. These are recoverable:
/// the caller keeps its in-memory state and may retry.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read collection '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write collection '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("failed to remove collection '{key}': {reason}")]
    Remove { key: String, reason: String },

    #[error("collection '{key}' has an invalid format: {reason}")]
    Codec { key: String, reason: String },
}

impl PersistenceError {
    pub fn key(&self) -> &str {
        match self {
            PersistenceError::Read { key, .. }
            | PersistenceError::Write { key, .. }
            | PersistenceError::Remove { key, .. }
            | PersistenceError::Codec { key, .. } => key,
        }
    }
}

/// Async key/value storage of serialized collections.
///
/// ## Semantics
///
/// - `get` returns `None` for a key that was never written (or was removed).
/// - `set` replaces the whole value; there are no partial writes.
/// - `remove` of an absent key succeeds.
///
/// Adapters know nothing about the schema of what they store.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;

    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Type-erased adapter, used when the backend is picked from configuration.
pub type SharedAdapter = Arc<dyn PersistenceAdapter>;

#[async_trait]
impl<S> PersistenceAdapter for Arc<S>
where
    S: PersistenceAdapter + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key).await
    }
}
