//! JSON encoding of whole collections.
//!
//! A collection is a JSON array of flat records. Amounts are strings inside the
//! records, so encoding never reformats them.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::r#trait::{PersistenceAdapter, PersistenceError};

pub fn encode<T: Serialize>(key: &str, records: &[T]) -> Result<String, PersistenceError> {
    serde_json::to_string(records).map_err(|e| PersistenceError::Codec {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Vec<T>, PersistenceError> {
    serde_json::from_str(raw).map_err(|e| PersistenceError::Codec {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Read a collection; a key that was never written is an empty collection.
pub async fn load<T, A>(adapter: &A, key: &str) -> Result<Vec<T>, PersistenceError>
where
    T: DeserializeOwned,
    A: PersistenceAdapter + ?Sized,
{
    match adapter.get(key).await? {
        Some(raw) => decode(key, &raw),
        None => Ok(Vec::new()),
    }
}

/// Replace a collection with `records`.
pub async fn save<T, A>(adapter: &A, key: &str, records: &[T]) -> Result<(), PersistenceError>
where
    T: Serialize + Sync,
    A: PersistenceAdapter + ?Sized,
{
    let raw = encode(key, records)?;
    adapter.set(key, raw).await
}
