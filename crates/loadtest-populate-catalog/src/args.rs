//! CLI argument definitions for the catalog populator.

use crate::config::{AddressSpace, CatalogConfig, Padding};
use clap::Args;
use loadtest_populate::PoolArgs;

/// Catalog populate arguments.
#[derive(Args, Clone, Debug)]
pub struct CatalogPopulateArgs {
    /// Number of nodes to register
    #[arg(long, default_value = "300000")]
    pub nodes: u64,

    /// Services registered on every node
    #[arg(long, default_value = "10")]
    pub services_per_node: u32,

    /// Health checks registered for every service
    #[arg(long, default_value = "3")]
    pub checks_per_service: u32,

    /// Port of the first service on each node
    #[arg(long, default_value = "8080")]
    pub base_port: u16,

    /// Hosts per synthetic address block (fourth octet range)
    #[arg(long, default_value = "128", value_parser = clap::value_parser!(u32).range(1..=256))]
    pub address_span: u32,

    /// Number of synthetic address blocks available
    #[arg(long, default_value = "65536", value_parser = clap::value_parser!(u32).range(1..=65536))]
    pub address_octet_budget: u32,

    /// Size of the random hex blob stored in node meta (0 = none)
    #[arg(long, default_value = "0")]
    pub node_meta_bytes: usize,

    /// Size of the random hex blob stored in service meta (0 = none)
    #[arg(long, default_value = "0")]
    pub service_meta_bytes: usize,

    /// Size of the random hex check output (0 = none)
    #[arg(long, default_value = "0")]
    pub check_output_bytes: usize,

    #[command(flatten)]
    pub pool: PoolArgs,
}

impl CatalogPopulateArgs {
    pub fn to_config(&self) -> CatalogConfig {
        CatalogConfig {
            nodes: self.nodes,
            services_per_node: self.services_per_node,
            checks_per_service: self.checks_per_service,
            base_port: self.base_port,
            address_space: AddressSpace {
                span: self.address_span,
                octet_budget: self.address_octet_budget,
            },
            padding: Padding {
                node_meta_bytes: self.node_meta_bytes,
                service_meta_bytes: self.service_meta_bytes,
                check_output_bytes: self.check_output_bytes,
            },
        }
    }
}
