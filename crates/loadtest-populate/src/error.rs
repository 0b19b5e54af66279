//! Error types for the worker pool.

use thiserror::Error;

/// Outcome of a failed work item, returned by the per-item callback.
#[derive(Error, Debug)]
pub enum ItemError {
    /// The item could not be written. Logged and handled per
    /// [`crate::ErrorPolicy`]; the other items keep going.
    #[error("{0:#}")]
    Failed(anyhow::Error),

    /// An unrecoverable environment fault. Stops the whole run regardless of
    /// policy.
    #[error("{0:#}")]
    Fatal(anyhow::Error),
}

impl ItemError {
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        ItemError::Failed(err.into())
    }

    pub fn fatal(err: impl Into<anyhow::Error>) -> Self {
        ItemError::Fatal(err.into())
    }
}

/// Errors returned by [`crate::WorkDistributor::run`].
#[derive(Error, Debug)]
pub enum DistributeError {
    /// The distributor configuration is unusable.
    #[error("invalid worker pool configuration: {0}")]
    InvalidConfig(String),

    /// An item reported a fatal error and the run was stopped.
    #[error("fatal error while processing item {index}: {error}")]
    Fatal { index: u64, error: String },

    /// Items failed under the `collect` or `fail-fast` policy.
    #[error("{failed} of {total} items failed (first failure at item {first_index}: {first_error})")]
    ItemsFailed {
        failed: u64,
        total: u64,
        first_index: u64,
        first_error: String,
    },

    /// A worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    WorkerPanicked(String),
}
