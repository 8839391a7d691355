//! Persisted batch records

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Batch id → batch, exactly as persisted under the storage key.
pub type BatchMap = BTreeMap<String, ImageBatch>;

/// A single image, content-encoded as a self-contained data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    /// Original file name
    pub name: String,
    /// MIME type, e.g. `image/png`
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data_url: String,
    /// Size of the original content in bytes
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBatch {
    pub id: String,
    pub files: Vec<StoredFile>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expiry_timestamp: DateTime<Utc>,
}

impl ImageBatch {
    pub fn new(
        id: String,
        files: Vec<StoredFile>,
        created_at: DateTime<Utc>,
        retention: Duration,
    ) -> Self {
        // Saturate instead of overflowing for absurd retention windows
        let expiry_timestamp = created_at
            .checked_add_signed(retention)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            id,
            files,
            created_at,
            expiry_timestamp,
        }
    }

    /// A batch is logically deleted from the instant its expiry is reached.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_timestamp <= now
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
