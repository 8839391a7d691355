//! Key-value store abstraction

use crate::error::StorageError;
use crate::Result;

/// A string-keyed persistent store with whole-value reads and writes.
///
/// Implementations must leave the previous value untouched when
/// `set_item` fails.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Check that replacing `key` with `value` keeps the store within `quota`.
///
/// `current_usage` is the total size of all keys and values now stored and
/// `existing_len` the size of the entry being replaced (zero if new).
pub(crate) fn check_quota(
    quota: Option<usize>,
    current_usage: usize,
    existing_len: usize,
    key: &str,
    value: &str,
) -> Result<()> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let needed = current_usage.saturating_sub(existing_len) + key.len() + value.len();
    if needed > quota {
        tracing::warn!(key = %key, needed, quota, "Write rejected: storage quota exceeded");
        return Err(StorageError::QuotaExceeded { needed, quota });
    }

    Ok(())
}
