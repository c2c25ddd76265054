use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Collection queried in the external point store.
    pub collection: String,
    /// Enable sparse+dense hybrid search.
    pub hybrid_enabled: bool,
    /// Fusion method for hybrid results: "rrf" or "dbsf".
    pub fusion_method: String,
    /// RRF rank constant.
    pub rrf_k: u32,
    /// Prefetch multiplier applied to the request limit per arm.
    pub prefetch_multiplier: usize,
    /// Enable best-effort reranking of fused results.
    pub rerank_enabled: bool,
    /// Payload field holding candidate text for reranking.
    pub payload_text_field: String,
    /// Base URL of the remote reranking service.
    pub rerank_endpoint: Option<String>,
    /// Request timeout against the reranking service (milliseconds).
    pub rerank_timeout_ms: u64,
    /// Per-call deadline applied to each backend wait (milliseconds).
    pub deadline_ms: Option<u64>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            collection: defaults::DEFAULT_COLLECTION.to_string(),
            hybrid_enabled: defaults::DEFAULT_HYBRID_ENABLED,
            fusion_method: defaults::DEFAULT_FUSION_METHOD.to_string(),
            rrf_k: defaults::DEFAULT_RRF_K,
            prefetch_multiplier: defaults::DEFAULT_PREFETCH_MULTIPLIER,
            rerank_enabled: defaults::DEFAULT_RERANK_ENABLED,
            payload_text_field: defaults::DEFAULT_PAYLOAD_TEXT_FIELD.to_string(),
            rerank_endpoint: None,
            rerank_timeout_ms: defaults::DEFAULT_RERANK_TIMEOUT_MS,
            deadline_ms: None,
        }
    }
}
