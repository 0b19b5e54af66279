//! Error types for the KV populator.

use loadtest_generator::BlobError;
use registry_client::RegistryError;
use thiserror::Error;

/// Errors that abort a KV populate or cleanup.
#[derive(Error, Debug)]
pub enum KvPopulatorError {
    #[error("failed to write key '{key}': {source}")]
    Put {
        key: String,
        #[source]
        source: RegistryError,
    },

    #[error("failed to delete keys under '{prefix}': {source}")]
    Clean {
        prefix: String,
        #[source]
        source: RegistryError,
    },

    #[error("blob generation failed: {0}")]
    Blob(#[from] BlobError),
}
