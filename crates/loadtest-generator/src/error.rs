//! Error types for blob and identifier generation.

use thiserror::Error;

/// Errors raised while drawing random data.
#[derive(Error, Debug)]
pub enum BlobError {
    /// The OS randomness source failed or is exhausted.
    #[error("randomness source failed: {0}")]
    Randomness(#[from] rand::rand_core::OsError),
}
