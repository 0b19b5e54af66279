//! Catalog populator for registry load testing.
//!
//! Fabricates a hierarchical catalog (nodes, each with services, each with
//! health checks) and registers it through a [`registry_client::RegistryClient`].
//! Nodes are fanned out over a fixed worker pool; each node and its whole
//! subtree is written start-to-finish by one worker.
//!
//! # Architecture
//!
//! ```text
//!  WorkDistributor ── index ──► RecordBuilder ──► NodeRecords
//!                                                    │
//!                                                    ▼
//!                                             RegistryWriter
//!                                   node ─► service ─► checks ─► service ─► ...
//!                                                    │
//!                                                    ▼
//!                                             RegistryClient
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use loadtest_populate::DistributorConfig;
//! use loadtest_populate_catalog::{CatalogConfig, CatalogPopulator};
//! use registry_client::MemoryRegistry;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(MemoryRegistry::new());
//! let config = CatalogConfig { nodes: 100, ..Default::default() };
//! let populator = CatalogPopulator::new(registry, config, DistributorConfig::default())?;
//! let metrics = populator.populate().await?;
//! println!("{} nodes in {:?}", metrics.items_succeeded, metrics.total_duration);
//! ```

pub mod args;
pub mod builder;
pub mod config;
pub mod error;
pub mod populator;
pub mod writer;

pub use args::CatalogPopulateArgs;
pub use builder::{
    check_id, check_name, derive_address, index_width, service_name, CheckRecord, NodeRecord,
    NodeRecords, RecordBuilder, ServiceRecord, ServiceWithChecks,
};
pub use config::{AddressSpace, CatalogConfig, Padding};
pub use error::{CatalogPopulatorError, RecordError};
pub use populator::CatalogPopulator;
pub use writer::RegistryWriter;
