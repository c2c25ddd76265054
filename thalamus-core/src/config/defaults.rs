// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_DENSE_PROVIDER: &str = "remote";
pub const DEFAULT_SPARSE_PROVIDER: &str = "hashed";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_SPARSE_VOCAB_SIZE: u32 = 30_522;
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_QUERY_CACHE_SIZE: u64 = 10_000;

// --- Retrieval ---
pub const DEFAULT_COLLECTION: &str = "passages";
pub const DEFAULT_HYBRID_ENABLED: bool = true;
pub const DEFAULT_FUSION_METHOD: &str = "rrf";
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_PREFETCH_MULTIPLIER: usize = 2;
pub const DEFAULT_RERANK_ENABLED: bool = false;
pub const DEFAULT_RERANK_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_PAYLOAD_TEXT_FIELD: &str = "text";

// --- Routing cache ---
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 1_000;
pub const DEFAULT_ROUTE_TTL_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_SHADOW_MODE: bool = false;

// --- Priors ---
pub const DEFAULT_CROSS_TENANT_ENABLED: bool = false;
pub const DEFAULT_MAX_EFFECTIVE_SAMPLES: f64 = 100.0;
