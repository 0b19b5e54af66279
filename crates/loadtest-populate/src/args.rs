//! Worker pool CLI arguments shared by pooled populators.

use crate::distributor::{DistributorConfig, ErrorPolicy};
use crate::duration::parse_duration;
use clap::Args;
use std::time::Duration;

/// Worker pool arguments.
///
/// Flattened into every populator that fans work out over
/// [`crate::WorkDistributor`].
#[derive(Args, Clone, Debug)]
pub struct PoolArgs {
    /// Number of concurrent workers
    #[arg(long, default_value = "1000")]
    pub workers: usize,

    /// How per-item failures affect the run result
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Log)]
    pub error_policy: ErrorPolicy,

    /// Interval between progress lines (e.g. "500ms", "5s", "1m"; "0" disables)
    #[arg(long, default_value = "5s", value_parser = parse_duration)]
    pub progress_interval: Duration,
}

impl PoolArgs {
    /// Build the distributor configuration; `label` names the progress lines.
    pub fn to_config(&self, label: &str) -> DistributorConfig {
        DistributorConfig {
            workers: self.workers,
            error_policy: self.error_policy,
            progress_interval: self.progress_interval,
            label: label.to_string(),
        }
    }
}
