//! SnapShare Batches
//!
//! - A batch is a set of images uploaded together, sharing one id,
//!   one creation time and one expiry time
//! - Images are stored inline as data URLs; there is no blob store
//! - Batches are never updated, only created and deleted
//! - Expired batches are swept before every read or write

mod clock;
pub mod data_url;
mod error;
mod ids;
mod model;
mod selection;
mod service;
mod store;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::BatchError;
pub use model::{BatchMap, ImageBatch, StoredFile};
pub use selection::{FileSource, PendingFile, Selection};
pub use service::BatchService;
pub use store::RecordStore;
pub use sweeper::sweep;

pub type Result<T> = std::result::Result<T, BatchError>;

/// Retention window applied when none is configured.
pub const DEFAULT_RETENTION_HOURS: i64 = 72;

/// Storage key holding the serialized batch map.
pub const DEFAULT_STORAGE_KEY: &str = "imageShareBatches";
