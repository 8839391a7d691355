//! In-memory key-value store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::StorageError;
use crate::kv::{check_quota, KeyValueStore};
use crate::Result;

/// Process-local store, used for tests and ephemeral profiles.
///
/// Can be switched off with [`MemoryStore::set_disabled`], after which every
/// operation fails with [`StorageError::Unavailable`].
#[derive(Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
    disabled: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn usage(&self) -> usize {
        self.items
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.disabled.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory store is disabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_enabled()?;

        let mut items = self.items.write();
        if self.quota.is_some() {
            let current: usize = items.iter().map(|(k, v)| k.len() + v.len()).sum();
            let existing = items.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            check_quota(self.quota, current, existing, key, value)?;
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.ensure_enabled()?;
        self.items.write().remove(key);
        Ok(())
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            quota: self.quota,
            disabled: Arc::clone(&self.disabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.usage(), 2);

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_clones_share_contents() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set_item("shared", "yes").unwrap();
        assert_eq!(other.get_item("shared").unwrap().as_deref(), Some("yes"));
    }

    #[test]
    fn test_disabled_store_fails_every_operation() {
        let store = MemoryStore::new();
        store.set_item("a", "1").unwrap();
        store.set_disabled(true);

        assert!(matches!(
            store.get_item("a"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.set_item("a", "2").is_err());
        assert!(store.remove_item("a").is_err());

        store.set_disabled(false);
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_value() {
        let store = MemoryStore::new().with_quota(Some(8));
        store.set_item("k", "1234").unwrap();

        let err = store.set_item("k", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("1234"));
    }
}
