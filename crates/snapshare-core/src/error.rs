//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] snapshare_storage::StorageError),

    #[error(transparent)]
    Batch(#[from] snapshare_batches::BatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid share link: {0}")]
    InvalidLink(String),
}

impl CoreError {
    /// The requested batch does not exist or has expired.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::Batch(snapshare_batches::BatchError::NotFound(_))
        )
    }

    /// Storage refused a write because it is full or unavailable.
    pub fn is_storage_full_or_unavailable(&self) -> bool {
        match self {
            CoreError::Storage(e) => e.is_capacity_or_availability(),
            CoreError::Batch(snapshare_batches::BatchError::Storage(e)) => {
                e.is_capacity_or_availability()
            }
            _ => false,
        }
    }
}
