//! Catalog populator.

use crate::builder::RecordBuilder;
use crate::config::CatalogConfig;
use crate::error::CatalogPopulatorError;
use crate::writer::RegistryWriter;
use loadtest_populate::{DistributorConfig, ItemError, PopulateMetrics, WorkDistributor};
use registry_client::RegistryClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Populates the catalog with `config.nodes` fabricated nodes.
///
/// Node indices are fanned out over a [`WorkDistributor`]; each worker
/// builds a node's records and writes them in order. A failed registration
/// loses that node only. Record build failures (address overflow, randomness
/// exhaustion) are fatal and stop the run.
pub struct CatalogPopulator<C> {
    builder: Arc<RecordBuilder>,
    writer: Arc<RegistryWriter<C>>,
    distributor: WorkDistributor,
}

impl<C: RegistryClient + 'static> CatalogPopulator<C> {
    /// Create a populator. Fails if the configuration cannot be honoured,
    /// including a node count that exceeds the address space.
    pub fn new(
        client: Arc<C>,
        config: CatalogConfig,
        pool: DistributorConfig,
    ) -> Result<Self, CatalogPopulatorError> {
        let builder = RecordBuilder::new(config)?;
        let distributor = WorkDistributor::new(pool)?;

        Ok(Self {
            builder: Arc::new(builder),
            writer: Arc::new(RegistryWriter::new(client)),
            distributor,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        self.builder.config()
    }

    /// Register every node, service and check.
    pub async fn populate(&self) -> Result<PopulateMetrics, CatalogPopulatorError> {
        let config = self.builder.config();
        info!(
            "Populating catalog: {} nodes x {} services x {} checks ({} workers)",
            config.nodes,
            config.services_per_node,
            config.checks_per_service,
            self.distributor.config().workers
        );

        let builder = Arc::clone(&self.builder);
        let writer = Arc::clone(&self.writer);
        let metrics = self
            .distributor
            .run(config.nodes, move |index| {
                let builder = Arc::clone(&builder);
                let writer = Arc::clone(&writer);
                async move { populate_node(&builder, &writer, index).await }
            })
            .await?;

        info!(
            "Catalog populated: {} nodes written, {} failed in {:?} ({:.1} nodes/s)",
            metrics.items_succeeded,
            metrics.items_failed,
            metrics.total_duration,
            metrics.items_per_second()
        );

        Ok(metrics)
    }
}

async fn populate_node<C: RegistryClient>(
    builder: &RecordBuilder,
    writer: &RegistryWriter<C>,
    index: u64,
) -> Result<(), ItemError> {
    let start = Instant::now();

    let records = builder.build_node(index).map_err(ItemError::fatal)?;
    writer.write_node(&records).await.map_err(|e| {
        ItemError::failed(anyhow::Error::new(e).context(format!("node {}", records.node.name)))
    })?;

    debug!(index, node = %records.node.name, dur = ?start.elapsed(), "populate node");
    Ok(())
}
