use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::r#trait::{PersistenceAdapter, PersistenceError};

/// Directory-backed adapter: one `<key>.json` file per collection.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct FileAdapter {
    dir: PathBuf,
}

impl FileAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{key}.json")))
    }
}

fn invalid_key(key: &str) -> String {
    format!("'{key}' is not a valid collection key")
}

#[async_trait]
impl PersistenceAdapter for FileAdapter {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key).ok_or_else(|| PersistenceError::Read {
            key: key.to_string(),
            reason: invalid_key(key),
        })?;

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read {
                key: key.to_string(),
                reason: format!("{}: {e}", path.display()),
            }),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let path = self.path_for(key).ok_or_else(|| PersistenceError::Write {
            key: key.to_string(),
            reason: invalid_key(key),
        })?;
        let write_err = |e: std::io::Error| PersistenceError::Write {
            key: key.to_string(),
            reason: format!("{}: {e}", path.display()),
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key).ok_or_else(|| PersistenceError::Remove {
            key: key.to_string(),
            reason: invalid_key(key),
        })?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Remove {
                key: key.to_string(),
                reason: format!("{}: {e}", path.display()),
            }),
        }
    }
}
