//! Random payload and identifier generation for registry load testing.
//!
//! Every function here draws from the operating system's cryptographic
//! randomness source. Records are padded with these blobs to reach a target
//! size, and every catalog registration gets a fresh [`unique_id`].
//!
//! A failing randomness source is reported as [`BlobError::Randomness`].
//! Callers treat it as an unrecoverable environment fault and abort the run.
//!
//! # Example
//!
//! ```rust
//! use loadtest_generator::{random_bytes, random_hex, unique_id};
//!
//! let value = random_bytes(400).unwrap();
//! assert_eq!(value.len(), 400);
//!
//! let padding = random_hex(1024).unwrap();
//! assert_eq!(padding.len(), 1024);
//!
//! let id = unique_id().unwrap();
//! assert_eq!(id.get_version_num(), 4);
//! ```

pub mod blob;
pub mod error;
pub mod id;

pub use blob::{random_bytes, random_hex};
pub use error::BlobError;
pub use id::unique_id;
