//! Record store: the serialized batch map under one storage key

use std::sync::Arc;

use snapshare_storage::KeyValueStore;

use crate::model::BatchMap;
use crate::Result;

pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Read the full batch map.
    ///
    /// Missing or corrupt data yields an empty map and corruption is only
    /// logged; the next successful save overwrites it. A backend that cannot
    /// be read is an error, so its contents are never replaced blindly.
    pub fn load(&self) -> Result<BatchMap> {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(BatchMap::new()),
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to read batch records");
                return Err(e.into());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Stored batch records are corrupt, treating as empty"
                );
                Ok(BatchMap::new())
            }
        }
    }

    /// Persist the full batch map, replacing whatever was stored.
    pub fn save(&self, batches: &BatchMap) -> Result<()> {
        let json = serde_json::to_string(batches)?;
        self.backend.set_item(&self.key, &json).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to save batch records");
            e
        })?;
        Ok(())
    }
}

impl Clone for RecordStore {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            key: self.key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageBatch;
    use crate::BatchError;
    use chrono::{Duration, Utc};
    use snapshare_storage::{Database, MemoryStore, StorageError};

    fn batch(id: &str) -> ImageBatch {
        ImageBatch::new(id.to_string(), Vec::new(), Utc::now(), Duration::hours(72))
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let store = RecordStore::new(Arc::new(MemoryStore::new()), "batches");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let backend = MemoryStore::new();
        backend.set_item("batches", "{not json").unwrap();
        let store = RecordStore::new(Arc::new(backend.clone()), "batches");
        assert!(store.load().unwrap().is_empty());

        // Valid JSON of the wrong shape is also treated as corrupt
        backend.set_item("batches", "[1, 2, 3]").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_backend_is_an_error() {
        let backend = MemoryStore::new();
        backend.set_disabled(true);
        let store = RecordStore::new(Arc::new(backend), "batches");
        assert!(matches!(
            store.load(),
            Err(BatchError::Storage(StorageError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let db = Database::open_in_memory().unwrap();
        let store = RecordStore::new(Arc::new(db), "batches");

        let mut map = BatchMap::new();
        map.insert("a".to_string(), batch("a"));
        map.insert("b".to_string(), batch("b"));
        store.save(&map).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_save_reports_full_storage() {
        let backend = MemoryStore::new().with_quota(Some(32));
        let store = RecordStore::new(Arc::new(backend), "batches");

        let mut map = BatchMap::new();
        map.insert("a".to_string(), batch("a"));

        let err = store.save(&map).unwrap_err();
        assert!(matches!(
            err,
            BatchError::Storage(StorageError::QuotaExceeded { .. })
        ));
    }
}
