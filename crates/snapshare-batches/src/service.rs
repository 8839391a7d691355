//! Batch service
//!
//! Every operation sweeps expired batches first, so callers never observe
//! a batch past its expiry. Read-modify-write cycles are serialized so the
//! background sweeper cannot interleave with a user operation.

use chrono::Duration;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::BatchError;
use crate::ids::{generate_id, generate_unique_id};
use crate::model::{ImageBatch, StoredFile};
use crate::selection::PendingFile;
use crate::store::RecordStore;
use crate::sweeper::{sweep, sweep_counting};
use crate::Result;

pub struct BatchService {
    store: RecordStore,
    clock: Arc<dyn Clock>,
    /// How long a batch lives after creation
    retention: Duration,
    /// Held for the duration of each load-modify-save cycle
    write_lock: Arc<Mutex<()>>,
}

impl BatchService {
    pub fn new(store: RecordStore, clock: Arc<dyn Clock>, retention: Duration) -> Self {
        Self {
            store,
            clock,
            retention,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Encode `files` and store them as a new batch, returning its id.
    ///
    /// Files are read one at a time, in order. The first file that cannot be
    /// read aborts the whole batch and nothing is stored.
    pub async fn create(&self, files: Vec<PendingFile>) -> Result<String> {
        if files.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in &files {
            match file.encode(generate_id()).await {
                Ok(record) => stored.push(record),
                Err(e) => {
                    tracing::error!(file_name = %file.name, error = %e, "Error processing file, batch aborted");
                    return Err(e);
                }
            }
        }

        let batch = self.insert_batch(stored)?;

        tracing::info!(
            batch_id = %batch.id,
            file_count = batch.file_count(),
            total_size = batch.total_size(),
            expires_at = %batch.expiry_timestamp.to_rfc3339(),
            "Created image batch"
        );

        Ok(batch.id)
    }

    fn insert_batch(&self, files: Vec<StoredFile>) -> Result<ImageBatch> {
        let _guard = self.write_lock.lock();

        let now = self.clock.now();
        let mut batches = sweep(&self.store, now)?;

        let id = generate_unique_id(|candidate| batches.contains_key(candidate));
        let batch = ImageBatch::new(id.clone(), files, now, self.retention);

        batches.insert(id, batch.clone());
        self.store.save(&batches)?;

        Ok(batch)
    }

    /// Look up a live batch.
    pub fn fetch(&self, batch_id: &str) -> Result<ImageBatch> {
        let _guard = self.write_lock.lock();

        let mut batches = sweep(&self.store, self.clock.now())?;

        // Re-check against the clock at lookup time; the batch may have
        // expired since the sweep's timestamp was taken.
        let now = self.clock.now();
        match batches.get(batch_id) {
            Some(batch) if !batch.is_expired(now) => Ok(batch.clone()),
            Some(_) => {
                batches.remove(batch_id);
                self.store.save(&batches)?;
                tracing::info!(batch_id = %batch_id, "Batch expired on access and removed");
                Err(BatchError::NotFound(batch_id.to_string()))
            }
            None => Err(BatchError::NotFound(batch_id.to_string())),
        }
    }

    /// Remove a batch. Unknown ids are ignored.
    pub fn delete(&self, batch_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut batches = sweep(&self.store, self.clock.now())?;
        if batches.remove(batch_id).is_some() {
            self.store.save(&batches)?;
            tracing::info!(batch_id = %batch_id, "Deleted image batch");
        } else {
            tracing::debug!(batch_id = %batch_id, "Delete of unknown batch ignored");
        }

        Ok(())
    }

    /// All live batches, newest first.
    pub fn list(&self) -> Result<Vec<ImageBatch>> {
        let _guard = self.write_lock.lock();

        let now = self.clock.now();
        let batches = sweep(&self.store, now)?;

        let mut live: Vec<ImageBatch> = batches
            .into_values()
            .filter(|batch| !batch.is_expired(now))
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(live)
    }

    /// Evict expired batches now. Returns how many were removed.
    pub fn sweep_expired(&self) -> Result<usize> {
        let _guard = self.write_lock.lock();
        let (_, evicted) = sweep_counting(&self.store, self.clock.now())?;
        Ok(evicted)
    }
}

impl Clone for BatchService {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: Arc::clone(&self.clock),
            retention: self.retention,
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}
