//! Common types and utilities for registry populators.
//!
//! This crate provides the pieces shared by the catalog and KV populators:
//!
//! - [`WorkDistributor`]: a fixed pool of workers draining one shared queue
//!   of item indices
//! - [`ProgressReporter`]: periodic `current`/`total` log lines
//! - [`PopulateMetrics`]: the summary every populate run returns
//! - [`PoolArgs`]: CLI arguments for the worker pool
//!
//! # Architecture
//!
//! ```text
//!   producer: 0, 1, 2, ... total-1
//!        │
//!        ▼
//!   ┌──────────────────────┐
//!   │  mpsc queue (cap 1)  │
//!   └──────────┬───────────┘
//!        ┌─────┼─────┬──────────┐
//!        ▼     ▼     ▼          ▼
//!    worker 0  1     2   ...  N-1     per_item(index)
//!        │     │     │          │
//!        └─────┴──┬──┴──────────┘
//!                 ▼
//!          ProgressReporter ──► "progress current=.. total=.."
//! ```

pub mod args;
pub mod distributor;
pub mod duration;
pub mod error;
pub mod metrics;
pub mod progress;

pub use args::PoolArgs;
pub use distributor::{DistributorConfig, ErrorPolicy, WorkDistributor};
pub use duration::parse_duration;
pub use error::{DistributeError, ItemError};
pub use metrics::PopulateMetrics;
pub use progress::{ProgressCounter, ProgressReporter};
