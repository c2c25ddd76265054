//! Composition-root integration tests: one config, one injected point
//! store, every engine reachable and serving.

use std::sync::Arc;

use async_trait::async_trait;
use thalamus::{
    global, init_global, is_initialized, logging, FusionMethod, IPointStore, RequestContext,
    RoutingDecision, ScoredPoint, SparseVector, Thalamus, ThalamusConfig, ThalamusResult,
};

// ═══════════════════════════════════════════════════════════════════
// Test Infrastructure
// ═══════════════════════════════════════════════════════════════════

struct FixtureStore;

#[async_trait]
impl IPointStore for FixtureStore {
    async fn dense_search(
        &self,
        _collection: &str,
        _query: &[f32],
        limit: usize,
        _filter: Option<&serde_json::Value>,
    ) -> ThalamusResult<Vec<ScoredPoint>> {
        let points = vec![
            ScoredPoint::new("doc-a", 0.92),
            ScoredPoint::new("doc-b", 0.81),
            ScoredPoint::new("doc-c", 0.66),
        ];
        Ok(points.into_iter().take(limit).collect())
    }

    async fn sparse_search(
        &self,
        _collection: &str,
        _query: &SparseVector,
        limit: usize,
        _filter: Option<&serde_json::Value>,
    ) -> ThalamusResult<Vec<ScoredPoint>> {
        let points = vec![ScoredPoint::new("doc-b", 11.0), ScoredPoint::new("doc-d", 7.5)];
        Ok(points.into_iter().take(limit).collect())
    }
}

fn config() -> ThalamusConfig {
    let mut config = ThalamusConfig::default();
    config.embedding.dense_provider = "hashed".to_string();
    config
}

fn runtime() -> Thalamus {
    match Thalamus::new(config(), Arc::new(FixtureStore), None, None) {
        Ok(rt) => rt,
        Err(e) => panic!("runtime construction failed: {e}"),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn runtime_serves_hybrid_retrieval_end_to_end() {
    let rt = runtime();

    let response = rt
        .retrieval
        .retrieve("how are reward priors seeded", 3, None)
        .await;

    assert_eq!(response.fusion_method, FusionMethod::Rrf);
    assert!(!response.reranked);
    assert!(response.metadata.error.is_none());
    assert_eq!(response.points.len(), 3);
    assert_eq!(response.scores.len(), 3);
    // doc-b appears in both arms, so it fuses to the top.
    assert_eq!(response.points[0].id, "doc-b");
}

#[tokio::test]
async fn engines_serve_their_own_domains_from_one_runtime() {
    let rt = runtime();

    // Priors: nothing is known about this model, so Beta(1, 1).
    assert_eq!(
        rt.priors.get_prior_for_model("gpt-nano", None, "tenant-a"),
        (1.0, 1.0)
    );

    // Routing cache: the hashed fallback is non-semantic, so inserts
    // are refused and lookups are forced misses.
    let ctx = RequestContext::default().with_task_type("qa");
    assert!(!rt
        .routing_cache
        .set("hello", &ctx, "gpt-nano", RoutingDecision::default(), None));
    assert!(rt.routing_cache.get("hello", &ctx, 50.0).is_none());

    let stats = rt.routing_cache.stats();
    assert_eq!(stats.insertions, 0);
    assert_eq!(stats.misses, 1);

    // Retrieval still works off the same matcher.
    let response = rt.retrieval.retrieve("unrelated", 1, None).await;
    assert_eq!(response.points.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════
// Global accessor
// ═══════════════════════════════════════════════════════════════════

#[test]
fn global_installation_is_lazy_and_idempotent() {
    let first = init_global(runtime());
    let second = init_global(runtime());
    assert!(Arc::ptr_eq(&first, &second));

    let fetched = global().unwrap();
    assert!(Arc::ptr_eq(&first, &fetched));
    assert!(is_initialized());
}

#[test]
fn tracing_init_is_idempotent() {
    logging::init_tracing();
    logging::init_tracing();
}
