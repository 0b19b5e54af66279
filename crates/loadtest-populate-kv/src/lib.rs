//! KV store populator for registry load testing.
//!
//! Writes a fixed number of random blobs under a key prefix, one put at a
//! time, and removes them again with a single recursive delete.
//!
//! # Example
//!
//! ```rust,ignore
//! use loadtest_populate_kv::{KvConfig, KvPopulator};
//! use registry_client::MemoryRegistry;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(MemoryRegistry::new());
//! let populator = KvPopulator::new(registry, KvConfig::default());
//! let metrics = populator.populate().await?;
//! populator.clean().await?;
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod populator;

pub use args::KvPopulateArgs;
pub use config::KvConfig;
pub use error::KvPopulatorError;
pub use populator::{entry_key, KvPopulator};
