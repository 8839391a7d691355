//! Batch error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Batch not found or expired: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] snapshare_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error processing file {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Please select at least one image")]
    EmptyBatch,

    #[error("You can upload a maximum of {max} images")]
    TooManyFiles { max: usize },

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}
