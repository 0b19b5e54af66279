//! In-process registry for tests and dry runs.

use crate::error::RegistryError;
use crate::traits::RegistryClient;
use crate::types::{AgentService, CatalogRegistration, HealthCheck};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A node as stored by [`MemoryRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNode {
    pub id: String,
    pub address: String,
    pub meta: BTreeMap<String, String>,
    pub services: BTreeMap<String, AgentService>,
    pub checks: BTreeMap<String, HealthCheck>,
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, MemoryNode>,
    kv: BTreeMap<String, Vec<u8>>,
    catalog_writes: u64,
}

/// Registry that keeps the catalog and KV store in memory.
///
/// It applies the same upsert rules as a Consul catalog: registering a node
/// again replaces its address, id and meta; services and checks are keyed by
/// their IDs within the node. A check bound to a service the node does not
/// have is rejected, as the real agent does.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: RwLock<State>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one node.
    pub async fn node(&self, name: &str) -> Option<MemoryNode> {
        self.state.read().await.nodes.get(name).cloned()
    }

    /// Number of registered nodes.
    pub async fn node_count(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    /// Total services over all nodes.
    pub async fn service_count(&self) -> usize {
        let state = self.state.read().await;
        state.nodes.values().map(|n| n.services.len()).sum()
    }

    /// Total checks over all nodes.
    pub async fn check_count(&self) -> usize {
        let state = self.state.read().await;
        state.nodes.values().map(|n| n.checks.len()).sum()
    }

    /// Number of `catalog_register` calls accepted.
    pub async fn catalog_writes(&self) -> u64 {
        self.state.read().await.catalog_writes
    }

    /// All keys starting with `prefix`, sorted.
    pub async fn kv_keys(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim_start_matches('/');
        self.state
            .read()
            .await
            .kv
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Value stored under `key`.
    pub async fn kv_get(&self, key: &str) -> Option<Vec<u8>> {
        let key = key.trim_start_matches('/');
        self.state.read().await.kv.get(key).cloned()
    }
}

#[async_trait::async_trait]
impl RegistryClient for MemoryRegistry {
    async fn catalog_register(
        &self,
        registration: &CatalogRegistration,
    ) -> Result<(), RegistryError> {
        if registration.node.is_empty() {
            return Err(RegistryError::Rejected("missing node name".to_string()));
        }
        if registration.address.is_empty() {
            return Err(RegistryError::Rejected(format!(
                "missing address for node '{}'",
                registration.node
            )));
        }

        let mut state = self.state.write().await;
        let node = state.nodes.entry(registration.node.clone()).or_default();

        // Validate before mutating so a rejected write leaves no trace
        for check in &registration.checks {
            let service_known = check.service_id.is_empty()
                || node.services.contains_key(&check.service_id)
                || registration
                    .service
                    .as_ref()
                    .is_some_and(|s| s.id == check.service_id);
            if !service_known {
                return Err(RegistryError::Rejected(format!(
                    "check '{}' references unknown service '{}' on node '{}'",
                    check.check_id, check.service_id, registration.node
                )));
            }
        }

        node.id = registration.id.clone();
        node.address = registration.address.clone();
        node.meta = registration.node_meta.clone();

        if let Some(service) = &registration.service {
            node.services.insert(service.id.clone(), service.clone());
        }
        for check in &registration.checks {
            node.checks.insert(check.check_id.clone(), check.clone());
        }

        state.catalog_writes += 1;
        Ok(())
    }

    async fn kv_put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
        let key = key.trim_start_matches('/');
        self.state
            .write()
            .await
            .kv
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn kv_delete_tree(&self, prefix: &str) -> Result<(), RegistryError> {
        let prefix = prefix.trim_start_matches('/');
        self.state
            .write()
            .await
            .kv
            .retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CHECK_STATUS_PASSING;

    fn node_registration(name: &str) -> CatalogRegistration {
        CatalogRegistration {
            id: format!("{name}-id"),
            node: name.to_string(),
            address: "10.0.0.1".to_string(),
            ..Default::default()
        }
    }

    fn service(id: &str) -> AgentService {
        AgentService {
            id: id.to_string(),
            service: id.to_string(),
            port: 8080,
            meta: BTreeMap::new(),
        }
    }

    fn check(node: &str, id: &str, service_id: &str) -> HealthCheck {
        HealthCheck {
            node: node.to_string(),
            check_id: id.to_string(),
            name: id.to_string(),
            status: CHECK_STATUS_PASSING.to_string(),
            output: String::new(),
            service_id: service_id.to_string(),
            service_name: service_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_node_service_checks() {
        let registry = MemoryRegistry::new();

        registry
            .catalog_register(&node_registration("n1"))
            .await
            .unwrap();

        let mut with_service = node_registration("n1");
        with_service.service = Some(service("app"));
        registry.catalog_register(&with_service).await.unwrap();

        let mut with_checks = node_registration("n1");
        with_checks.checks = vec![check("n1", "c0", ""), check("n1", "c1", "app")];
        registry.catalog_register(&with_checks).await.unwrap();

        let node = registry.node("n1").await.unwrap();
        assert_eq!(node.id, "n1-id");
        assert_eq!(node.services.len(), 1);
        assert_eq!(node.checks.len(), 2);
        assert_eq!(registry.catalog_writes().await, 3);
    }

    #[tokio::test]
    async fn test_check_for_unknown_service_rejected() {
        let registry = MemoryRegistry::new();

        let mut reg = node_registration("n1");
        reg.checks = vec![check("n1", "c1", "missing")];

        let err = registry.catalog_register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::Rejected(_)));
        assert_eq!(registry.check_count().await, 0);
        assert_eq!(registry.catalog_writes().await, 0);
    }

    #[tokio::test]
    async fn test_reregistration_overwrites() {
        let registry = MemoryRegistry::new();

        let mut reg = node_registration("n1");
        reg.service = Some(service("app"));
        registry.catalog_register(&reg).await.unwrap();
        registry.catalog_register(&reg).await.unwrap();

        assert_eq!(registry.node_count().await, 1);
        assert_eq!(registry.service_count().await, 1);
    }

    #[tokio::test]
    async fn test_kv_delete_tree_by_prefix() {
        let registry = MemoryRegistry::new();
        registry.kv_put("a/key-0", b"x").await.unwrap();
        registry.kv_put("a/key-1", b"y").await.unwrap();
        registry.kv_put("b/key-0", b"z").await.unwrap();

        registry.kv_delete_tree("a/").await.unwrap();
        assert_eq!(registry.kv_keys("").await, vec!["b/key-0".to_string()]);

        registry.kv_delete_tree("/").await.unwrap();
        assert!(registry.kv_keys("").await.is_empty());
    }
}
