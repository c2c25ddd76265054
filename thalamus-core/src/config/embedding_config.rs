use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Dense provider: "remote" or "hashed".
    pub dense_provider: String,
    /// Sparse provider: "remote", "hashed", or "off".
    pub sparse_provider: String,
    /// Base URL of the remote embedding service.
    pub remote_endpoint: Option<String>,
    /// Request timeout against the remote service (milliseconds).
    pub remote_timeout_ms: u64,
    /// Dense embedding dimensions.
    pub dimensions: usize,
    /// Sparse vocabulary size (hash buckets for the fallback encoder).
    pub sparse_vocab_size: u32,
    /// Query-embedding cache max entries.
    pub query_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dense_provider: defaults::DEFAULT_DENSE_PROVIDER.to_string(),
            sparse_provider: defaults::DEFAULT_SPARSE_PROVIDER.to_string(),
            remote_endpoint: None,
            remote_timeout_ms: defaults::DEFAULT_REMOTE_TIMEOUT_MS,
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            sparse_vocab_size: defaults::DEFAULT_SPARSE_VOCAB_SIZE,
            query_cache_size: defaults::DEFAULT_QUERY_CACHE_SIZE,
        }
    }
}
