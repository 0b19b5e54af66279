//! Error types for the catalog populator.

use loadtest_generator::BlobError;
use loadtest_populate::DistributeError;
use thiserror::Error;

/// Errors from record construction. Every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The node index does not fit the configured address space.
    #[error(
        "node index {index} exceeds the address space \
         ({span} hosts x {octet_budget} blocks = {capacity} nodes)"
    )]
    AddressSpaceExhausted {
        index: u64,
        span: u32,
        octet_budget: u32,
        capacity: u64,
    },

    /// The catalog configuration is unusable.
    #[error("invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// Random padding or the node ID could not be generated.
    #[error("blob generation failed: {0}")]
    Blob(#[from] BlobError),
}

/// Errors that can occur during catalog population.
#[derive(Error, Debug)]
pub enum CatalogPopulatorError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Distribute(#[from] DistributeError),
}
