//! Error types for registry clients.

use thiserror::Error;

/// Errors returned by a [`crate::RegistryClient`].
///
/// Populators surface these unmodified; they never retry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The configured agent address is not usable.
    #[error("invalid registry address '{0}'")]
    InvalidAddress(String),

    /// The request never produced a response (connect, timeout, body I/O).
    #[error("request {method} {url} failed: {source}")]
    Request {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The registry answered with a non-success status.
    #[error("request {method} {url} returned status {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The registry refused the write (in-memory registry validation).
    #[error("registration rejected: {0}")]
    Rejected(String),
}
