//! Catalog writes for one node subtree.

use crate::builder::{CheckRecord, NodeRecord, NodeRecords, ServiceRecord};
use registry_client::{AgentService, CatalogRegistration, HealthCheck, RegistryClient, RegistryError};
use std::sync::Arc;
use tracing::trace;

/// Issues catalog registrations through a shared registry client.
///
/// Each call is a single pass-through registration; errors come back exactly
/// as the client reported them.
pub struct RegistryWriter<C> {
    client: Arc<C>,
}

impl<C: RegistryClient> RegistryWriter<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Register the node on its own.
    pub async fn register_node(&self, node: &NodeRecord) -> Result<(), RegistryError> {
        trace!(node = %node.name, address = %node.address, "register node");
        self.client.catalog_register(&node_registration(node)).await
    }

    /// Register one service on the node.
    pub async fn register_service(
        &self,
        node: &NodeRecord,
        service: &ServiceRecord,
    ) -> Result<(), RegistryError> {
        trace!(node = %node.name, service = %service.name, "register service");
        let registration = CatalogRegistration {
            service: Some(AgentService {
                id: service.id.clone(),
                service: service.name.clone(),
                port: service.port,
                meta: service.meta.clone(),
            }),
            ..node_registration(node)
        };
        self.client.catalog_register(&registration).await
    }

    /// Register the checks of one service in a single call.
    pub async fn register_checks(
        &self,
        node: &NodeRecord,
        service: &ServiceRecord,
        checks: &[CheckRecord],
    ) -> Result<(), RegistryError> {
        if checks.is_empty() {
            return Ok(());
        }
        trace!(node = %node.name, service = %service.name, checks = checks.len(), "register checks");
        let registration = CatalogRegistration {
            checks: checks
                .iter()
                .map(|check| HealthCheck {
                    node: node.name.clone(),
                    check_id: check.id.clone(),
                    name: check.name.clone(),
                    status: check.status.clone(),
                    output: check.output.clone(),
                    service_id: check.service_id.clone(),
                    service_name: check.service_name.clone(),
                })
                .collect(),
            ..node_registration(node)
        };
        self.client.catalog_register(&registration).await
    }

    /// Write a whole node subtree: the node, then each service followed by
    /// its checks. Stops at the first failing call.
    pub async fn write_node(&self, records: &NodeRecords) -> Result<(), RegistryError> {
        self.register_node(&records.node).await?;
        for entry in &records.services {
            self.register_service(&records.node, &entry.service).await?;
            self.register_checks(&records.node, &entry.service, &entry.checks)
                .await?;
        }
        Ok(())
    }
}

/// Every registration restates the node so the agent does not clear its
/// address or meta.
fn node_registration(node: &NodeRecord) -> CatalogRegistration {
    CatalogRegistration {
        id: node.id.to_string(),
        node: node.name.clone(),
        address: node.address.to_string(),
        node_meta: node.meta.clone(),
        service: None,
        checks: Vec::new(),
    }
}
