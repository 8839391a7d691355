//! CLI command handlers
//!
//! Handlers write to a caller-supplied writer and translate core errors
//! into the messages users see.

pub mod delete;
pub mod sweep;
pub mod upload;
pub mod view;

use snapshare_core::{BatchError, CoreError, Gallery};

/// Turn a core error into a user-facing message. Storage, encoding and
/// missing-batch failures get fixed wording; anything else is shown as is.
pub fn user_error(gallery: &Gallery, err: CoreError) -> anyhow::Error {
    if err.is_not_found() {
        return anyhow::anyhow!(gallery.not_found_message());
    }
    if err.is_storage_full_or_unavailable() {
        return anyhow::anyhow!("Could not save images. Storage might be full or disabled.");
    }
    if let CoreError::Batch(BatchError::Encode { name, .. }) = &err {
        return anyhow::anyhow!(
            "Error processing file {name}. It might be too large or corrupted."
        );
    }
    err.into()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use snapshare_core::{Config, Gallery, ManualClock, MemoryStore};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    pub fn gallery_with(backend: MemoryStore) -> (Gallery, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        let gallery = Gallery::with_backend(
            Config::new(PathBuf::from("/unused")),
            Arc::new(backend),
            Arc::new(clock.clone()),
        );
        (gallery, clock)
    }

    pub fn gallery() -> (Gallery, ManualClock) {
        gallery_with(MemoryStore::new())
    }

    pub fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(name.as_bytes());
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }
}
