//! SnapShare Core
//!
//! Central coordination layer: configuration, the gallery that fronts the
//! batch service, share-link addressing and the background expiry sweeper.
//! Front ends talk to [`Gallery`] and never touch storage directly.

mod config;
mod error;
pub mod format;
mod gallery;
mod scheduler;
pub mod share;

pub use config::Config;
pub use error::CoreError;
pub use gallery::{Gallery, SharedBatch};
pub use scheduler::{spawn_sweeper, SweeperHandle};

// Re-export the batch layer for front ends
pub use snapshare_batches::{
    data_url, BatchError, BatchService, Clock, ImageBatch, ManualClock, PendingFile, Selection,
    StoredFile, SystemClock,
};
pub use snapshare_storage::{Database, KeyValueStore, MemoryStore, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
