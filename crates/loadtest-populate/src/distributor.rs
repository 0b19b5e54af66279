//! Bounded-concurrency work distribution.
//!
//! A [`WorkDistributor`] owns one shared queue of item indices and a fixed
//! pool of tokio tasks. All workers are started before the first index is
//! sent; the producer sends `0..total` in order and then closes the queue,
//! which is the only termination signal. Each index is delivered to exactly
//! one worker. Completion order across workers is unspecified.

use crate::error::{DistributeError, ItemError};
use crate::metrics::PopulateMetrics;
use crate::progress::{ProgressCounter, ProgressReporter};
use clap::ValueEnum;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

/// How per-item failures affect the result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ErrorPolicy {
    /// Log each failure and keep going; the run always succeeds
    #[default]
    Log,
    /// Log each failure and keep going; the run fails if any item failed
    Collect,
    /// Stop enqueueing after the first failure and fail the run
    FailFast,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Log => write!(f, "log"),
            ErrorPolicy::Collect => write!(f, "collect"),
            ErrorPolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

/// Immutable worker pool configuration.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// Number of worker tasks, at least 1.
    pub workers: usize,
    pub error_policy: ErrorPolicy,
    /// Interval between progress lines; zero disables them.
    pub progress_interval: Duration,
    /// Label attached to progress lines (e.g. "node").
    pub label: String,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            workers: 1000,
            error_policy: ErrorPolicy::Log,
            progress_interval: Duration::from_secs(5),
            label: "item".to_string(),
        }
    }
}

/// State shared by the producer and all workers.
#[derive(Default)]
struct RunState {
    succeeded: AtomicU64,
    failed: AtomicU64,
    /// Set when the producer should stop enqueueing.
    stop: AtomicBool,
    first_failure: StdMutex<Option<(u64, String)>>,
    fatal: StdMutex<Option<(u64, String)>>,
}

impl RunState {
    fn record_failure(&self, index: u64, err: &ItemError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut first) = self.first_failure.lock() {
            first.get_or_insert_with(|| (index, err.to_string()));
        }
    }

    fn record_fatal(&self, index: u64, err: &ItemError) {
        if let Ok(mut fatal) = self.fatal.lock() {
            fatal.get_or_insert_with(|| (index, err.to_string()));
        }
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Fixed-size worker pool over a single shared work queue.
#[derive(Debug, Clone)]
pub struct WorkDistributor {
    config: DistributorConfig,
}

impl WorkDistributor {
    pub fn new(config: DistributorConfig) -> Result<Self, DistributeError> {
        if config.workers == 0 {
            return Err(DistributeError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    /// Invoke `per_item` once for every index in `0..total`.
    ///
    /// Failures are isolated per item: an [`ItemError::Failed`] is logged
    /// and the worker moves on to its next index. What the run returns then
    /// depends on the [`ErrorPolicy`]. An [`ItemError::Fatal`] stops the
    /// producer and fails the run under every policy.
    pub async fn run<F, Fut>(
        &self,
        total: u64,
        per_item: F,
    ) -> Result<PopulateMetrics, DistributeError>
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ItemError>> + Send + 'static,
    {
        let start = Instant::now();
        let policy = self.config.error_policy;

        info!(
            label = %self.config.label,
            total,
            workers = self.config.workers,
            policy = %policy,
            "starting worker pool"
        );

        let (tx, rx) = mpsc::channel::<u64>(1);
        let rx = Arc::new(Mutex::new(rx));
        let per_item = Arc::new(per_item);
        let state = Arc::new(RunState::default());
        let progress =
            ProgressReporter::start(&self.config.label, total, self.config.progress_interval);

        let mut handles = Vec::with_capacity(self.config.workers);
        for worker in 0..self.config.workers {
            handles.push(tokio::spawn(worker_loop(
                worker,
                Arc::clone(&rx),
                Arc::clone(&per_item),
                Arc::clone(&state),
                progress.counter(),
                policy,
            )));
        }

        for index in 0..total {
            if state.stop.load(Ordering::SeqCst) {
                debug!(index, "producer stopped early");
                break;
            }
            if tx.send(index).await.is_err() {
                // Every worker is gone; the join below reports why
                break;
            }
        }
        drop(tx);

        let mut panicked = None;
        for handle in handles {
            if let Err(e) = handle.await {
                panicked.get_or_insert_with(|| e.to_string());
            }
        }
        progress.finish().await;

        if let Some(reason) = panicked {
            return Err(DistributeError::WorkerPanicked(reason));
        }

        let metrics = PopulateMetrics {
            items_total: total,
            items_succeeded: state.succeeded.load(Ordering::Relaxed),
            items_failed: state.failed.load(Ordering::Relaxed),
            bytes_written: None,
            total_duration: start.elapsed(),
        };

        if let Some((index, error)) = take(&state.fatal) {
            return Err(DistributeError::Fatal { index, error });
        }

        if metrics.items_failed > 0 && policy != ErrorPolicy::Log {
            let (first_index, first_error) = take(&state.first_failure).unwrap_or_default();
            return Err(DistributeError::ItemsFailed {
                failed: metrics.items_failed,
                total,
                first_index,
                first_error,
            });
        }

        info!(
            label = %self.config.label,
            succeeded = metrics.items_succeeded,
            failed = metrics.items_failed,
            elapsed_ms = metrics.total_duration.as_millis() as u64,
            items_per_sec = metrics.items_per_second(),
            "worker pool finished"
        );

        Ok(metrics)
    }
}

async fn worker_loop<F, Fut>(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<u64>>>,
    per_item: Arc<F>,
    state: Arc<RunState>,
    progress: ProgressCounter,
    policy: ErrorPolicy,
) where
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ItemError>> + Send + 'static,
{
    loop {
        // The lock is only held while waiting for the next index
        let next = rx.lock().await.recv().await;
        let Some(index) = next else {
            break;
        };

        match per_item(index).await {
            Ok(()) => {
                state.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(err @ ItemError::Failed(_)) => {
                error!(worker, index, error = %err, "error populating item");
                state.record_failure(index, &err);
                if policy == ErrorPolicy::FailFast {
                    state.stop.store(true, Ordering::SeqCst);
                }
            }
            Err(err @ ItemError::Fatal(_)) => {
                error!(worker, index, error = %err, "fatal error, stopping run");
                state.record_fatal(index, &err);
            }
        }
        progress.inc();
    }
}

fn take(slot: &StdMutex<Option<(u64, String)>>) -> Option<(u64, String)> {
    slot.lock().ok().and_then(|mut guard| guard.take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn distributor(workers: usize, error_policy: ErrorPolicy) -> WorkDistributor {
        WorkDistributor::new(DistributorConfig {
            workers,
            error_policy,
            progress_interval: Duration::ZERO,
            label: "test".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = WorkDistributor::new(DistributorConfig {
            workers: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(DistributeError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_every_index_exactly_once() {
        for (total, workers) in [(1u64, 1usize), (10, 1), (10, 10), (100, 7), (1000, 64)] {
            let seen = Arc::new(StdMutex::new(Vec::new()));
            let seen_in = Arc::clone(&seen);

            let metrics = distributor(workers, ErrorPolicy::Log)
                .run(total, move |index| {
                    let seen = Arc::clone(&seen_in);
                    async move {
                        seen.lock().unwrap().push(index);
                        Ok(())
                    }
                })
                .await
                .unwrap();

            let seen = seen.lock().unwrap();
            assert_eq!(seen.len() as u64, total, "W={workers} T={total}");
            let unique: HashSet<u64> = seen.iter().copied().collect();
            assert_eq!(unique, (0..total).collect::<HashSet<_>>());
            assert_eq!(metrics.items_succeeded, total);
            assert_eq!(metrics.items_failed, 0);
        }
    }

    #[tokio::test]
    async fn test_more_workers_than_items() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in = Arc::clone(&calls);

        let metrics = distributor(50, ErrorPolicy::Log)
            .run(3, move |_| {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(metrics.items_total, 3);
    }

    #[tokio::test]
    async fn test_zero_items() {
        let metrics = tokio_test::assert_ok!(
            distributor(4, ErrorPolicy::Collect)
                .run(0, |_| async { Ok(()) })
                .await
        );
        assert_eq!(metrics.items_processed(), 0);
    }

    #[tokio::test]
    async fn test_log_policy_swallows_failures() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in = Arc::clone(&calls);

        let metrics = distributor(4, ErrorPolicy::Log)
            .run(100, move |index| {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if index % 10 == 0 {
                        return Err(ItemError::failed(anyhow::anyhow!("boom {index}")));
                    }
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 100);
        assert_eq!(metrics.items_failed, 10);
        assert_eq!(metrics.items_succeeded, 90);
    }

    #[tokio::test]
    async fn test_collect_policy_reports_failures() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in = Arc::clone(&calls);

        let err = distributor(4, ErrorPolicy::Collect)
            .run(50, move |index| {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if index == 7 || index == 21 {
                        return Err(ItemError::failed(anyhow::anyhow!("boom")));
                    }
                    Ok(())
                }
            })
            .await
            .unwrap_err();

        // All items still processed
        assert_eq!(calls.load(Ordering::SeqCst), 50);
        match err {
            DistributeError::ItemsFailed { failed, total, first_error, .. } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 50);
                assert_eq!(first_error, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fail_fast_stops_enqueueing() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in = Arc::clone(&calls);

        let err = distributor(1, ErrorPolicy::FailFast)
            .run(10_000, move |index| {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if index == 5 {
                        return Err(ItemError::failed(anyhow::anyhow!("boom")));
                    }
                    Ok(())
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DistributeError::ItemsFailed { first_index: 5, .. }
        ));
        // At most a couple of already-queued indices run after the failure
        assert!(calls.load(Ordering::SeqCst) < 10);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_under_log_policy() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in = Arc::clone(&calls);

        let err = distributor(2, ErrorPolicy::Log)
            .run(10_000, move |index| {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if index == 3 {
                        return Err(ItemError::fatal(anyhow::anyhow!("no entropy")));
                    }
                    Ok(())
                }
            })
            .await
            .unwrap_err();

        match err {
            DistributeError::Fatal { index, error } => {
                assert_eq!(index, 3);
                assert_eq!(error, "no entropy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(calls.load(Ordering::SeqCst) < 10_000);
    }

    #[tokio::test]
    async fn test_worker_panic_is_reported() {
        let err = tokio_test::assert_err!(
            distributor(2, ErrorPolicy::Log)
                .run(4, |index| async move {
                    if index == 1 {
                        panic!("worker blew up");
                    }
                    Ok(())
                })
                .await
        );
        assert!(matches!(err, DistributeError::WorkerPanicked(_)));
    }
}
