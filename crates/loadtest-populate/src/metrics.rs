//! Run summaries.

use std::time::Duration;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateMetrics {
    /// Number of items the run was asked to process.
    pub items_total: u64,
    /// Items written without error.
    pub items_succeeded: u64,
    /// Items whose write failed (logged, not retried).
    pub items_failed: u64,
    /// Payload bytes written, when the populator tracks it.
    pub bytes_written: Option<u64>,
    /// Total time taken.
    pub total_duration: Duration,
}

impl PopulateMetrics {
    /// Items processed (succeeded or failed).
    pub fn items_processed(&self) -> u64 {
        self.items_succeeded + self.items_failed
    }

    /// Calculate processed items per second.
    pub fn items_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.items_processed() as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_per_second() {
        let metrics = PopulateMetrics {
            items_total: 1000,
            items_succeeded: 990,
            items_failed: 10,
            bytes_written: None,
            total_duration: Duration::from_secs(4),
        };
        assert_eq!(metrics.items_processed(), 1000);
        assert_eq!(metrics.items_per_second(), 250.0);
    }

    #[test]
    fn test_items_per_second_zero_duration() {
        let metrics = PopulateMetrics::default();
        assert_eq!(metrics.items_per_second(), 0.0);
    }
}
