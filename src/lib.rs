//! Registry Populate Library
//!
//! Fills a Consul-style service registry with synthetic data for load
//! testing.
//!
//! # Modes
//!
//! - `catalog` - register nodes, each with services, each with health checks
//! - `kv` - write random blobs to the key/value store
//! - `kvclean` - delete everything under the KV prefix
//!
//! # CLI Usage
//!
//! ```bash
//! # Default scale against a local agent
//! registry-populate catalog
//!
//! # Small run against a remote datacenter
//! registry-populate catalog --http-addr consul.internal:8500 --datacenter dc2 \
//!   --nodes 1000 --services-per-node 2 --workers 50
//!
//! # KV blobs under a prefix, then remove them
//! registry-populate kv --kv-prefix loadtest/ --kv-blobs 1000
//! registry-populate kvclean --kv-prefix loadtest/
//!
//! # Exercise the generators without an agent
//! registry-populate catalog --dry-run --nodes 5000
//! ```

use anyhow::Context;
use clap::{Args, Parser, ValueEnum};
use loadtest_populate::parse_duration;
use loadtest_populate_catalog::{CatalogPopulateArgs, CatalogPopulator};
use loadtest_populate_kv::{KvPopulateArgs, KvPopulator};
use registry_client::{
    ConsulClient, ConsulConfig, MemoryRegistry, RegistryClient, DEFAULT_HTTP_ADDR,
};
use std::sync::Arc;
use std::time::Duration;

/// What to populate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Register nodes, services and health checks
    #[value(name = "catalog")]
    Catalog,
    /// Write random blobs to the KV store
    #[value(name = "kv")]
    Kv,
    /// Delete every key under the KV prefix
    #[value(name = "kvclean")]
    KvClean,
}

/// Registry connection options.
#[derive(Args, Clone, Debug)]
pub struct RegistryOpts {
    /// Registry HTTP address
    #[arg(long, env = "CONSUL_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: String,

    /// ACL token
    #[arg(long, env = "CONSUL_HTTP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Datacenter to write to (defaults to the agent's own)
    #[arg(long, env = "CONSUL_DATACENTER")]
    pub datacenter: Option<String>,

    /// Per-request timeout (e.g. "30s", "2m")
    #[arg(long, value_parser = parse_duration)]
    pub request_timeout: Option<Duration>,

    /// Write to an in-process registry instead of an agent
    #[arg(long)]
    pub dry_run: bool,
}

impl RegistryOpts {
    pub fn to_consul_config(&self) -> ConsulConfig {
        ConsulConfig {
            address: self.http_addr.clone(),
            token: self.token.clone(),
            datacenter: self.datacenter.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "registry-populate")]
#[command(about = "Synthetic load generator for Consul-style service registries")]
#[command(version)]
pub struct Cli {
    /// Population mode
    #[arg(value_enum)]
    pub mode: Mode,

    #[command(flatten)]
    pub registry: RegistryOpts,

    #[command(flatten)]
    pub catalog: CatalogPopulateArgs,

    #[command(flatten)]
    pub kv: KvPopulateArgs,
}

/// Build the registry client selected by `cli` and run its mode.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.registry.dry_run {
        tracing::info!("Running in dry-run mode - nothing is sent to a registry");
        let registry = Arc::new(MemoryRegistry::new());
        run_mode(cli.mode, Arc::clone(&registry), &cli.catalog, &cli.kv).await?;
        let nodes = registry.node_count().await;
        let services = registry.service_count().await;
        let checks = registry.check_count().await;
        let kv_keys = registry.kv_keys("").await.len();
        tracing::info!(nodes, services, checks, kv_keys, "dry run registry contents");
        return Ok(());
    }

    let client = ConsulClient::new(cli.registry.to_consul_config())
        .context("Failed to create registry client")?;
    tracing::info!("Target registry: {}", client.base_url());

    run_mode(cli.mode, Arc::new(client), &cli.catalog, &cli.kv).await
}

/// Run one mode against `client`.
pub async fn run_mode<C: RegistryClient + 'static>(
    mode: Mode,
    client: Arc<C>,
    catalog: &CatalogPopulateArgs,
    kv: &KvPopulateArgs,
) -> anyhow::Result<()> {
    match mode {
        Mode::Catalog => {
            let populator =
                CatalogPopulator::new(client, catalog.to_config(), catalog.pool.to_config("node"))
                    .context("Invalid catalog configuration")?;
            let metrics = populator
                .populate()
                .await
                .context("Catalog population failed")?;
            tracing::info!(
                "Catalog mode finished: {}/{} nodes in {:?}",
                metrics.items_succeeded,
                metrics.items_total,
                metrics.total_duration
            );
        }
        Mode::Kv => {
            let metrics = KvPopulator::new(client, kv.to_config())
                .populate()
                .await
                .context("KV population failed")?;
            tracing::info!(
                "KV mode finished: {} entries in {:?}",
                metrics.items_succeeded,
                metrics.total_duration
            );
        }
        Mode::KvClean => {
            KvPopulator::new(client, kv.to_config())
                .clean()
                .await
                .context("KV cleanup failed")?;
            tracing::info!("KV cleanup finished");
        }
    }
    Ok(())
}
