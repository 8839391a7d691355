//! Gallery: the front-end facing state container
//!
//! Owns the configuration and the batch service. Front ends go through
//! here for every operation and never touch storage themselves.

use std::path::Path;
use std::sync::Arc;

use snapshare_batches::{BatchService, Clock, ImageBatch, PendingFile, RecordStore, Selection, SystemClock};
use snapshare_storage::{Database, KeyValueStore};

use crate::config::Config;
use crate::error::CoreError;
use crate::scheduler::{spawn_sweeper, SweeperHandle};
use crate::share::{resolve_batch_ref, share_link};
use crate::Result;

/// A freshly stored batch and the link that opens it.
#[derive(Debug, Clone)]
pub struct SharedBatch {
    pub batch: ImageBatch,
    pub link: String,
}

pub struct Gallery {
    config: Config,
    batches: BatchService,
}

impl Gallery {
    /// Open the on-disk store described by `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?.with_quota(config.storage_quota_bytes);

        tracing::debug!(path = %config.database_path.display(), "Opened batch database");

        Ok(Self::with_backend(config, Arc::new(db), Arc::new(SystemClock)))
    }

    /// Build a gallery over any key-value backend and clock.
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = RecordStore::new(backend, config.storage_key.clone());
        let batches = BatchService::new(store, clock, config.retention());

        Self { config, batches }
    }

    /// Startup sweep. Returns how many expired batches were evicted.
    pub fn initialize(&self) -> Result<usize> {
        let evicted = self.batches.sweep_expired()?;
        tracing::info!(evicted, "Gallery initialized");
        Ok(evicted)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// An empty selection with the configured file limit.
    pub fn new_selection(&self) -> Selection {
        Selection::new(self.config.max_files)
    }

    /// Select image files from disk. Non-images are skipped; a missing
    /// path is an error.
    pub fn select_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Selection> {
        let mut candidates = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let file = PendingFile::from_path(path).map_err(|e| {
                CoreError::Io(std::io::Error::new(
                    e.kind(),
                    format!("{}: {}", path.display(), e),
                ))
            })?;
            candidates.push(file);
        }

        let mut selection = self.new_selection();
        selection.add(candidates)?;
        Ok(selection)
    }

    /// Store the selected images as a new batch and build its share link.
    pub async fn upload(&self, selection: Selection) -> Result<SharedBatch> {
        let files = selection.submit()?;
        let id = self.batches.create(files).await?;
        let batch = self.batches.fetch(&id)?;
        let link = self.share_link(&id)?;

        Ok(SharedBatch { batch, link })
    }

    /// Open a batch from a share link or bare id.
    pub fn view(&self, link_or_id: &str) -> Result<ImageBatch> {
        let id = self.resolve(link_or_id)?;
        Ok(self.batches.fetch(&id)?)
    }

    pub fn delete(&self, link_or_id: &str) -> Result<()> {
        let id = self.resolve(link_or_id)?;
        Ok(self.batches.delete(&id)?)
    }

    /// Live batches, newest first.
    pub fn list(&self) -> Result<Vec<ImageBatch>> {
        Ok(self.batches.list()?)
    }

    pub fn sweep(&self) -> Result<usize> {
        Ok(self.batches.sweep_expired()?)
    }

    pub fn share_link(&self, batch_id: &str) -> Result<String> {
        share_link(&self.config.share_base_url, batch_id)
    }

    /// Start the periodic sweep on the current tokio runtime.
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        spawn_sweeper(self.batches.clone(), self.config.sweep_interval())
    }

    /// User-facing text for a missing or expired batch.
    pub fn not_found_message(&self) -> String {
        format!(
            "Image batch not found or has expired. Links are valid for {} hours and depend on local storage on this device.",
            self.config.retention_hours
        )
    }

    fn resolve(&self, link_or_id: &str) -> Result<String> {
        resolve_batch_ref(link_or_id).ok_or_else(|| CoreError::InvalidLink(link_or_id.to_string()))
    }
}
