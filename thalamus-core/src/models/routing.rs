use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request features that partition the routing cache. Lookups only ever
/// match between requests whose contexts digest identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub task_type: Option<String>,
    pub language: Option<String>,
    pub user_tier: Option<String>,
    /// Free-form extras. Key-sorted by construction so digests stay
    /// canonical.
    pub extra: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Everything the router decided beyond the model id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub confidence: f64,
    pub estimated_cost_usd: Option<f64>,
    pub reasoning: Option<String>,
}

/// A cache hit: the stored decision annotated with match metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRoute {
    pub model: String,
    pub decision: RoutingDecision,
    /// Cosine similarity between the lookup query and the stored one.
    pub similarity: f64,
    /// The query text the entry was stored under.
    pub matched_query: String,
    pub age_secs: i64,
}

/// Routing-cache statistics snapshot. Reading one never mutates the
/// cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Hits that shadow mode withheld.
    pub shadow_hits: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub insertions: u64,
    pub entry_count: usize,
    pub hit_rate: f64,
    pub miss_rate: f64,
    pub avg_similarity_on_hit: f64,
    pub avg_latency_saved_ms: f64,
    pub total_latency_saved_ms: f64,
    pub shadow_mode: bool,
}
