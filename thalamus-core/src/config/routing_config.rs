use serde::{Deserialize, Serialize};

use super::defaults;

/// Routing-cache subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingCacheConfig {
    /// Maximum number of cached routing decisions.
    pub capacity: usize,
    /// Default entry TTL (seconds).
    pub default_ttl_secs: u64,
    /// Cosine similarity at or above which a lookup is a hit.
    pub similarity_threshold: f64,
    /// Observe-only mode: compute matches but never serve them.
    pub shadow_mode: bool,
}

impl Default for RoutingCacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_ROUTE_CACHE_CAPACITY,
            default_ttl_secs: defaults::DEFAULT_ROUTE_TTL_SECS,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            shadow_mode: defaults::DEFAULT_SHADOW_MODE,
        }
    }
}
