//! KV population settings.

/// Number, size and location of the blobs written to the KV store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvConfig {
    /// Number of entries to write.
    pub blobs: u64,
    /// Size of each value in bytes.
    pub blob_bytes: usize,
    /// Prepended verbatim to every key and used as the cleanup root.
    pub prefix: String,
    /// Log progress every this many entries (0 = never).
    pub progress_every: u64,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            blobs: 40_000,
            blob_bytes: 400,
            prefix: String::new(),
            progress_every: 100,
        }
    }
}
