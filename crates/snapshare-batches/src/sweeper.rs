//! Expiry sweep

use chrono::{DateTime, Utc};

use crate::model::BatchMap;
use crate::store::RecordStore;
use crate::Result;

/// Load the batch map, drop every batch expired at `now`, and persist the
/// survivors if anything was dropped. Returns the live map.
///
/// When nothing has expired the stored data is not rewritten.
pub fn sweep(store: &RecordStore, now: DateTime<Utc>) -> Result<BatchMap> {
    sweep_counting(store, now).map(|(live, _)| live)
}

/// Same as [`sweep`], also returning how many batches were evicted.
pub(crate) fn sweep_counting(store: &RecordStore, now: DateTime<Utc>) -> Result<(BatchMap, usize)> {
    let (live, expired) = partition_expired(store.load()?, now);

    if expired.is_empty() {
        return Ok((live, 0));
    }

    for id in &expired {
        tracing::info!(batch_id = %id, "Batch expired and removed");
    }
    store.save(&live)?;

    Ok((live, expired.len()))
}

fn partition_expired(batches: BatchMap, now: DateTime<Utc>) -> (BatchMap, Vec<String>) {
    let mut live = BatchMap::new();
    let mut expired = Vec::new();

    for (id, batch) in batches {
        if batch.is_expired(now) {
            expired.push(id);
        } else {
            live.insert(id, batch);
        }
    }

    (live, expired)
}
