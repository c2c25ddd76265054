//! Thalamus runtime: owns every engine behind one composition root.
//!
//! Engines are wired with explicit dependency injection. The caller
//! supplies the point store (and optionally a reranker and a metrics
//! sink); every engine shares one embedding matcher. Call sites that
//! cannot thread the instance through can install it behind the lazy
//! global accessor instead.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use thalamus_core::config::ThalamusConfig;
use thalamus_core::errors::ThalamusResult;
use thalamus_core::traits::{IMetricsSink, IPointStore, IReranker};
use thalamus_embeddings::EmbeddingMatcher;
use thalamus_priors::ColdStartPriors;
use thalamus_retrieval::{HybridRetriever, RemoteReranker};
use thalamus_routing::SemanticRouteCache;
use tracing::warn;

/// Process-wide instance, installed at most once.
static GLOBAL: OnceLock<Arc<Thalamus>> = OnceLock::new();

/// The central runtime owning all Thalamus engines.
pub struct Thalamus {
    pub matcher: Arc<EmbeddingMatcher>,
    pub retrieval: HybridRetriever,
    pub routing_cache: SemanticRouteCache,
    pub priors: ColdStartPriors,
    pub config: ThalamusConfig,
}

impl Thalamus {
    /// Wire every engine from one config and an injected point store.
    ///
    /// `reranker` and `metrics` are optional. When no reranker is
    /// injected but the config enables reranking against an endpoint,
    /// a remote reranker is built from the config; a failure there is
    /// absorbed, since reranking is best-effort.
    pub fn new(
        config: ThalamusConfig,
        store: Arc<dyn IPointStore>,
        reranker: Option<Arc<dyn IReranker>>,
        metrics: Option<Arc<dyn IMetricsSink>>,
    ) -> ThalamusResult<Self> {
        // Embeddings — shared by retrieval and the routing cache.
        let matcher = Arc::new(EmbeddingMatcher::new(&config.embedding));

        // Retrieval
        let reranker = reranker.or_else(|| reranker_from_config(&config));
        let mut retrieval =
            HybridRetriever::new(Arc::clone(&matcher), store, config.retrieval.clone());
        if let Some(reranker) = reranker {
            retrieval = retrieval.with_reranker(reranker);
        }
        if let Some(metrics) = metrics {
            retrieval = retrieval.with_metrics(metrics);
        }

        // Routing cache
        let routing_cache = SemanticRouteCache::new(Arc::clone(&matcher), &config.routing_cache)?;

        // Priors
        let priors = ColdStartPriors::new(&config.priors);

        Ok(Self {
            matcher,
            retrieval,
            routing_cache,
            priors,
            config,
        })
    }
}

fn reranker_from_config(config: &ThalamusConfig) -> Option<Arc<dyn IReranker>> {
    if !config.retrieval.rerank_enabled {
        return None;
    }
    let endpoint = config.retrieval.rerank_endpoint.as_deref()?;
    let timeout = Duration::from_millis(config.retrieval.rerank_timeout_ms);
    match RemoteReranker::new(endpoint, timeout) {
        Ok(reranker) => Some(Arc::new(reranker)),
        Err(e) => {
            warn!(endpoint, error = %e, "remote reranker unavailable, reranking disabled");
            None
        }
    }
}

/// Install `runtime` as the process-wide instance.
///
/// Idempotent: when an instance is already installed, the existing one
/// is kept and returned, and `runtime` is dropped.
pub fn init_global(runtime: Thalamus) -> Arc<Thalamus> {
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(runtime)))
}

/// The process-wide instance, when one has been installed.
pub fn global() -> Option<Arc<Thalamus>> {
    GLOBAL.get().cloned()
}

/// Check whether the global instance has been installed.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}
