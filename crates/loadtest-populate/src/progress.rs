//! Periodic progress reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Handle workers use to count completed items.
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    completed: Arc<AtomicU64>,
}

impl ProgressCounter {
    pub fn inc(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Logs `current` versus `total` on a fixed interval until finished.
///
/// Reporting is informational only; nothing reads the counter back except
/// the log line.
pub struct ProgressReporter {
    label: String,
    total: u64,
    counter: ProgressCounter,
    stop: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Start reporting. A zero `interval` disables the periodic lines; the
    /// final line from [`ProgressReporter::finish`] is still logged.
    pub fn start(label: &str, total: u64, interval: Duration) -> Self {
        let counter = ProgressCounter {
            completed: Arc::new(AtomicU64::new(0)),
        };
        let stop = Arc::new(Notify::new());

        let handle = (!interval.is_zero()).then(|| {
            let label = label.to_string();
            let counter = counter.clone();
            let stop = Arc::clone(&stop);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first tick completes immediately
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            info!(label = %label, current = counter.current(), total, "progress");
                        }
                        _ = stop.notified() => break,
                    }
                }
            })
        });

        Self {
            label: label.to_string(),
            total,
            counter,
            stop,
            handle,
        }
    }

    pub fn counter(&self) -> ProgressCounter {
        self.counter.clone()
    }

    /// Stop the periodic task, log the final count and return it.
    pub async fn finish(mut self) -> u64 {
        // notify_one stores a permit, so a stop racing the select is not lost
        self.stop.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        let current = self.counter.current();
        info!(label = %self.label, current, total = self.total, "progress complete");
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counter_shared_between_clones() {
        let reporter = ProgressReporter::start("test", 10, Duration::ZERO);
        let a = reporter.counter();
        let b = reporter.counter();
        a.inc();
        b.inc();
        b.inc();
        assert_eq!(reporter.finish().await, 3);
    }

    #[tokio::test]
    async fn test_finish_stops_periodic_task() {
        let reporter = ProgressReporter::start("test", 5, Duration::from_millis(10));
        let counter = reporter.counter();
        for _ in 0..5 {
            counter.inc();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let finished = tokio::time::timeout(Duration::from_secs(5), reporter.finish()).await;
        assert_eq!(finished.unwrap(), 5);
    }
}
