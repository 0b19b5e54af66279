//! RegistryClient trait definition.

use crate::error::RegistryError;
use crate::types::CatalogRegistration;

/// Trait for writing to a service registry.
///
/// Every method is a direct pass-through to the registry: no retry, no
/// local caching, no idempotence tracking. Writing the same registration
/// twice overwrites it.
///
/// # Usage Pattern
///
/// Populators use generics and hold the client behind an `Arc` shared by
/// every worker:
///
/// ```ignore
/// pub async fn populate<C: RegistryClient + 'static>(client: Arc<C>) -> Result<()> {
///     client.kv_put("key-0", b"value").await?;
/// }
/// ```
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    /// Register a node, and optionally a service and checks, in the catalog.
    async fn catalog_register(&self, registration: &CatalogRegistration)
        -> Result<(), RegistryError>;

    /// Store `value` under `key`, replacing any existing value.
    async fn kv_put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError>;

    /// Delete every key that starts with `prefix` in one call.
    ///
    /// A leading `/` is ignored, so `"/"` and `""` both address the whole
    /// store.
    async fn kv_delete_tree(&self, prefix: &str) -> Result<(), RegistryError>;
}
