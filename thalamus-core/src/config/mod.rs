//! Configuration for every subsystem, loadable from TOML with full defaults.

pub mod defaults;

mod embedding_config;
mod prior_config;
mod retrieval_config;
mod routing_config;

pub use embedding_config::EmbeddingConfig;
pub use prior_config::PriorConfig;
pub use retrieval_config::RetrievalConfig;
pub use routing_config::RoutingCacheConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ThalamusResult};

/// Top-level configuration. Every field has a working default, so an
/// empty document is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThalamusConfig {
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub routing_cache: RoutingCacheConfig,
    pub priors: PriorConfig,
}

impl ThalamusConfig {
    /// Parse a TOML document. Missing sections and fields fall back to
    /// defaults.
    pub fn from_toml(raw: &str) -> ThalamusResult<Self> {
        toml::from_str(raw).map_err(|e| {
            ConfigError::ParseFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Load a TOML config file from disk.
    pub fn load(path: &str) -> ThalamusResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }
}
