//! SnapShare Storage Layer
//!
//! Local key-value persistence modelled after a browser's storage area:
//! string keys, string values, an optional byte quota, and no network.
//! Callers depend on the [`KeyValueStore`] trait so the backend can be
//! swapped (SQLite on disk, or memory in tests).

mod database;
mod error;
mod kv;
mod memory;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;
