use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Cold-start prior subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorConfig {
    /// Path to the benchmark table (JSON document keyed by model id).
    pub benchmark_path: Option<String>,
    /// Model family edges: child model id -> parent model id.
    pub family: HashMap<String, String>,
    /// Share reward aggregates across tenants.
    pub cross_tenant_enabled: bool,
    /// Ceiling for the effective sample count in Beta conversion.
    pub max_effective_samples: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            benchmark_path: None,
            family: HashMap::new(),
            cross_tenant_enabled: defaults::DEFAULT_CROSS_TENANT_ENABLED,
            max_effective_samples: defaults::DEFAULT_MAX_EFFECTIVE_SAMPLES,
        }
    }
}
