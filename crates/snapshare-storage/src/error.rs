//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// True for failures where the medium itself refused the write
    /// (full or disabled), as opposed to a bug or corrupt database.
    pub fn is_capacity_or_availability(&self) -> bool {
        matches!(
            self,
            StorageError::QuotaExceeded { .. } | StorageError::Unavailable(_)
        )
    }
}
