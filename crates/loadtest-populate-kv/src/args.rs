//! CLI argument definitions for the KV populator.

use crate::config::KvConfig;
use clap::Args;

/// KV populate and cleanup arguments.
#[derive(Args, Clone, Debug)]
pub struct KvPopulateArgs {
    /// Number of KV entries to write
    #[arg(long, default_value = "40000")]
    pub kv_blobs: u64,

    /// Size of each KV value in bytes
    #[arg(long, default_value = "400")]
    pub kv_blob_bytes: usize,

    /// Key prefix for written entries; also the subtree removed by kvclean
    #[arg(long, default_value = "")]
    pub kv_prefix: String,

    /// Log KV progress every N entries (0 disables)
    #[arg(long, default_value = "100")]
    pub progress_every: u64,
}

impl KvPopulateArgs {
    pub fn to_config(&self) -> KvConfig {
        KvConfig {
            blobs: self.kv_blobs,
            blob_bytes: self.kv_blob_bytes,
            prefix: self.kv_prefix.clone(),
            progress_every: self.progress_every,
        }
    }
}
