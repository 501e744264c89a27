use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for independently encoded progress records.
///
/// Each key holds one record's encoded text. A write replaces exactly one
/// key and never touches the bytes of another, so every call is atomic on
/// its own; callers that update several keys get no cross-key transaction.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Fetch the encoded record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the record under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn KeyValueRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn KeyValueRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get("a").await.unwrap(), None);

        repo.put("a", "[]").await.unwrap();
        repo.put("b", "true").await.unwrap();
        assert_eq!(repo.get("a").await.unwrap().as_deref(), Some("[]"));

        repo.remove("a").await.unwrap();
        assert_eq!(repo.get("a").await.unwrap(), None);
        assert_eq!(repo.get("b").await.unwrap().as_deref(), Some("true"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn removing_missing_key_is_ok() {
        let repo = InMemoryRepository::new();
        repo.remove("missing").await.unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn clones_share_records() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.put("k", "1").await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("1"));
    }
}
