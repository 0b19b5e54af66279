//! Service registry client abstraction.
//!
//! This crate defines the `RegistryClient` trait, the small slice of a
//! Consul-style registry API that the populators write through:
//!
//! - catalog registration of a node, optionally with one service and a set
//!   of health checks
//! - key/value put
//! - recursive key/value delete under a prefix
//!
//! Two implementations are provided:
//!
//! - [`ConsulClient`] talks to a real agent over the HTTP API
//! - [`MemoryRegistry`] keeps everything in process, for tests and dry runs
//!
//! Populators are generic over the trait so the choice is made once at the
//! CLI entry point.

mod consul;
mod error;
mod memory;
mod traits;
mod types;

pub use consul::{ConsulClient, ConsulConfig, DEFAULT_HTTP_ADDR};
pub use error::RegistryError;
pub use memory::{MemoryNode, MemoryRegistry};
pub use traits::RegistryClient;
pub use types::{AgentService, CatalogRegistration, HealthCheck, CHECK_STATUS_PASSING};
