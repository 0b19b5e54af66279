//! Sequential KV writer and cleaner.

use crate::config::KvConfig;
use crate::error::KvPopulatorError;
use loadtest_generator::random_bytes;
use loadtest_populate::PopulateMetrics;
use registry_client::RegistryClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Key of the `index`th entry.
pub fn entry_key(prefix: &str, index: u64) -> String {
    format!("{prefix}key-{index}")
}

/// Fills the KV store with random blobs and removes them again.
///
/// Puts are issued one after another; the first failure ends the run.
pub struct KvPopulator<C> {
    client: Arc<C>,
    config: KvConfig,
}

impl<C: RegistryClient> KvPopulator<C> {
    pub fn new(client: Arc<C>, config: KvConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &KvConfig {
        &self.config
    }

    /// Write `config.blobs` entries of `config.blob_bytes` random bytes.
    pub async fn populate(&self) -> Result<PopulateMetrics, KvPopulatorError> {
        let total = self.config.blobs;
        info!(
            "Populating KV store: {} entries of {} bytes under '{}'",
            total, self.config.blob_bytes, self.config.prefix
        );

        let start = Instant::now();
        let mut bytes_written = 0u64;

        for index in 0..total {
            let key = entry_key(&self.config.prefix, index);
            let value = random_bytes(self.config.blob_bytes)?;

            self.client
                .kv_put(&key, &value)
                .await
                .map_err(|source| KvPopulatorError::Put {
                    key: key.clone(),
                    source,
                })?;
            bytes_written += value.len() as u64;

            let current = index + 1;
            if self.config.progress_every > 0 && current % self.config.progress_every == 0 {
                info!(current, total, "kv progress");
            }
        }

        let metrics = PopulateMetrics {
            items_total: total,
            items_succeeded: total,
            items_failed: 0,
            bytes_written: Some(bytes_written),
            total_duration: start.elapsed(),
        };

        info!(
            "KV populated: {} entries ({} bytes) in {:?} ({:.1} entries/s)",
            metrics.items_succeeded,
            bytes_written,
            metrics.total_duration,
            metrics.items_per_second()
        );

        Ok(metrics)
    }

    /// Remove every key under `config.prefix` in one recursive delete.
    pub async fn clean(&self) -> Result<(), KvPopulatorError> {
        let prefix = &self.config.prefix;
        info!("Deleting KV subtree '{}'", prefix);

        let start = Instant::now();
        self.client
            .kv_delete_tree(prefix)
            .await
            .map_err(|source| KvPopulatorError::Clean {
                prefix: prefix.clone(),
                source,
            })?;

        debug!(dur = ?start.elapsed(), "kv clean");
        Ok(())
    }
}
