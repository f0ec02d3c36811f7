//! Typed document store.
//!
//! Every piece of persisted state is a JSON document under a fixed key
//! (see [`crate::constants::storage_keys`]). The bytes live in a
//! [`StorageBackend`]; [`DocumentStore`] adds typed load/save and
//! serializes read-modify-write cycles.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Document '{key}' is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode document '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw key/value persistence.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Returns whether a document was removed.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn StorageBackend>,
    write_lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Loads and decodes a document. `Ok(None)` when the key was never written.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    /// Like [`Self::load`], but an absent or undecodable document yields
    /// `T::default()`. Backend failures are still returned.
    pub async fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StoreError> {
        match self.load(key).await {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(T::default()),
            Err(StoreError::Corrupt { key, source }) => {
                warn!("Document '{}' could not be decoded, using defaults: {}", key, source);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Loads a list document one record at a time. Records that fail to
    /// decode are logged and skipped so one bad entry does not hide the rest.
    /// Read paths only: writes go through [`Self::update`], which refuses a
    /// document it cannot fully decode.
    pub async fn load_records<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(Vec::new());
        };

        let items = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Document '{}' is not a list, ignoring it: {}", key, e);
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key, index, "Skipping undecodable record: {}", e),
            }
        }

        Ok(records)
    }

    pub async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(key, value).await
    }

    /// Loads a document, lets `f` modify it and writes it back. Concurrent
    /// updates through the same store are applied one after the other. When
    /// `f` fails nothing is written. A stored document that does not decode
    /// is returned as [`StoreError::Corrupt`] and left untouched.
    pub async fn update<T, R, E, F>(&self, key: &str, f: F) -> Result<R, E>
    where
        T: DeserializeOwned + Serialize + Default + Send + Sync,
        R: Send,
        E: From<StoreError>,
        F: FnOnce(&mut T) -> Result<R, E> + Send,
    {
        let _guard = self.write_lock.lock().await;

        let mut doc: T = self.load(key).await?.unwrap_or_default();
        let result = f(&mut doc)?;
        self.write(key, &doc).await?;

        Ok(result)
    }

    pub async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.backend.remove(key).await
    }

    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys().await
    }

    /// Raw document text, for export.
    pub async fn raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key).await
    }

    /// Writes raw document text after checking that it is valid JSON.
    pub async fn put_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        serde_json::from_str::<serde_json::Value>(&value).map_err(|source| {
            StoreError::Corrupt {
                key: key.to_string(),
                source,
            }
        })?;

        let _guard = self.write_lock.lock().await;
        self.backend.put(key, value).await
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        debug!(key, bytes = encoded.len(), "Writing document");
        self.backend.put(key, encoded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::AdvancedSettings;

    struct BrokenBackend;

    #[async_trait]
    impl StorageBackend for BrokenBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn keys(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_missing_document_loads_default() {
        let store = DocumentStore::in_memory();
        let loaded: AdvancedSettings = store.load_or_default("advanced").await.unwrap();
        assert_eq!(loaded, AdvancedSettings::default());
        assert!(store.load::<AdvancedSettings>("advanced").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_falls_back() {
        let store = DocumentStore::in_memory();
        store
            .backend
            .put("advanced", "{not json".to_string())
            .await
            .unwrap();

        assert!(matches!(
            store.load::<AdvancedSettings>("advanced").await,
            Err(StoreError::Corrupt { .. })
        ));
        let loaded: AdvancedSettings = store.load_or_default("advanced").await.unwrap();
        assert!(loaded.top_this_week);
    }

    #[tokio::test]
    async fn test_update_applies_and_persists() {
        let store = DocumentStore::in_memory();

        let len = store
            .update("list", |list: &mut Vec<u32>| {
                list.push(7);
                Ok::<_, StoreError>(list.len())
            })
            .await
            .unwrap();
        assert_eq!(len, 1);

        let list: Vec<u32> = store.load_or_default("list").await.unwrap();
        assert_eq!(list, vec![7]);
    }

    #[tokio::test]
    async fn test_failed_closure_writes_nothing() {
        let store = DocumentStore::in_memory();
        let result = store
            .update("list", |list: &mut Vec<u32>| {
                list.push(1);
                Err::<(), _>(StoreError::Backend("rejected".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(store.raw("list").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced() {
        let store = DocumentStore::new(Arc::new(BrokenBackend));
        let result = store.save("advanced", &AdvancedSettings::default()).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let store = DocumentStore::in_memory();

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update("list", move |list: &mut Vec<u32>| {
                        list.push(i);
                        Ok::<_, StoreError>(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let list: Vec<u32> = store.load_or_default("list").await.unwrap();
        assert_eq!(list.len(), 20);
    }

    #[tokio::test]
    async fn test_put_raw_rejects_invalid_json() {
        let store = DocumentStore::in_memory();
        assert!(store.put_raw("x", "nope".to_string()).await.is_err());
        store.put_raw("x", "[1,2]".to_string()).await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_document_survives_failed_update() {
        let store = DocumentStore::in_memory();
        store
            .backend
            .put("list", "[1, \"two\"".to_string())
            .await
            .unwrap();

        let result = store
            .update("list", |list: &mut Vec<u32>| {
                list.push(3);
                Ok::<_, StoreError>(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert_eq!(
            store.raw("list").await.unwrap().as_deref(),
            Some("[1, \"two\"")
        );
    }

    #[tokio::test]
    async fn test_load_records_skips_bad_items() {
        let store = DocumentStore::in_memory();
        store
            .backend
            .put("list", r#"[1, "two", 3]"#.to_string())
            .await
            .unwrap();

        let records: Vec<u32> = store.load_records("list").await.unwrap();
        assert_eq!(records, vec![1, 3]);

        store.backend.put("list", "{}".to_string()).await.unwrap();
        let records: Vec<u32> = store.load_records("list").await.unwrap();
        assert!(records.is_empty());
        assert!(store.load_records::<u32>("missing").await.unwrap().is_empty());
    }
}
