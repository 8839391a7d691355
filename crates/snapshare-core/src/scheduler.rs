//! Background expiry sweeper

use std::time::Duration;

use snapshare_batches::BatchService;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::MAX_SWEEP_INTERVAL_SECS;

/// Handle to a running sweeper task. Dropping it also stops the task,
/// without waiting for it.
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Sweeper task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Sweep expired batches every `period`, starting one period from now.
///
/// A failed sweep is logged and retried on the next tick. Periods longer
/// than a year are clamped to a year.
pub fn spawn_sweeper(service: BatchService, period: Duration) -> SweeperHandle {
    let period = period.min(Duration::from_secs(MAX_SWEEP_INTERVAL_SECS));
    let (tx, mut rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(period_secs = period.as_secs_f64(), "Expiry sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let service = service.clone();
                    match tokio::task::spawn_blocking(move || service.sweep_expired()).await {
                        Ok(Ok(0)) => tracing::debug!("Periodic sweep found nothing to evict"),
                        Ok(Ok(evicted)) => tracing::info!(evicted, "Periodic sweep evicted expired batches"),
                        Ok(Err(e)) => tracing::error!(error = %e, "Periodic sweep failed"),
                        Err(e) => tracing::error!(error = %e, "Periodic sweep panicked"),
                    }
                }
                _ = &mut rx => break,
            }
        }

        tracing::info!("Expiry sweeper stopped");
    });

    SweeperHandle {
        shutdown: Some(tx),
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use snapshare_batches::{ManualClock, PendingFile, RecordStore};
    use snapshare_storage::{KeyValueStore, MemoryStore, StorageError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sweeper_evicts_in_background() {
        let backend = MemoryStore::new();
        let clock = ManualClock::new(Utc::now());
        let service = BatchService::new(
            RecordStore::new(Arc::new(backend.clone()), "batches"),
            Arc::new(clock.clone()),
            chrono::Duration::hours(72),
        );

        service
            .create(vec![PendingFile::from_bytes("a.png", "image/png", vec![1, 2, 3])])
            .await
            .unwrap();
        clock.advance(chrono::Duration::hours(73));

        let handle = spawn_sweeper(service.clone(), Duration::from_millis(20));

        // Only the sweeper touches storage from here on
        let mut swept = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if backend.get_item("batches").unwrap().as_deref() == Some("{}") {
                swept = true;
                break;
            }
        }
        assert!(swept, "sweeper never pruned the expired batch");

        handle.shutdown().await;
    }

    /// Reads pass through; every write fails and is counted.
    struct RejectWrites {
        inner: MemoryStore,
        attempts: Arc<AtomicUsize>,
    }

    impl KeyValueStore for RejectWrites {
        fn get_item(&self, key: &str) -> snapshare_storage::Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> snapshare_storage::Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("writes rejected".to_string()))
        }

        fn remove_item(&self, _key: &str) -> snapshare_storage::Result<()> {
            Err(StorageError::Unavailable("writes rejected".to_string()))
        }
    }

    #[tokio::test]
    async fn test_sweeper_keeps_running_when_sweeps_fail() {
        let backend = MemoryStore::new();
        let clock = ManualClock::new(Utc::now());
        let seed = BatchService::new(
            RecordStore::new(Arc::new(backend.clone()), "batches"),
            Arc::new(clock.clone()),
            chrono::Duration::hours(1),
        );
        seed.create(vec![PendingFile::from_bytes("a.png", "image/png", vec![1])])
            .await
            .unwrap();
        clock.advance(chrono::Duration::hours(2));
        let before = backend.get_item("batches").unwrap();

        let attempts = Arc::new(AtomicUsize::new(0));
        let service = BatchService::new(
            RecordStore::new(
                Arc::new(RejectWrites {
                    inner: backend.clone(),
                    attempts: Arc::clone(&attempts),
                }),
                "batches",
            ),
            Arc::new(clock),
            chrono::Duration::hours(1),
        );

        // Every tick finds the expired batch and fails to persist the eviction
        let handle = spawn_sweeper(service, Duration::from_millis(10));
        for _ in 0..100 {
            if attempts.load(Ordering::SeqCst) >= 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(attempts.load(Ordering::SeqCst) >= 3);
        assert!(!handle.is_finished());
        assert_eq!(backend.get_item("batches").unwrap(), before);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_oversized_period_is_clamped() {
        let service = BatchService::new(
            RecordStore::new(Arc::new(MemoryStore::new()), "batches"),
            Arc::new(ManualClock::new(Utc::now())),
            chrono::Duration::hours(1),
        );

        let handle = spawn_sweeper(service, Duration::MAX);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        handle.shutdown().await;
    }
}
