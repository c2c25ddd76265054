//! HybridRetriever: sparse + dense prefetch, score fusion, optional
//! reranking.
//!
//! The call follows a fixed degradation ladder: hybrid fusion, then
//! dense-only, then an empty result tagged `none`. `retrieve()` itself
//! never returns an error; `fusion_method` is the mode indicator and
//! `metadata.error` carries the reason when the whole ladder fails.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thalamus_core::config::RetrievalConfig;
use thalamus_core::constants::MAX_PREFETCH_LIMIT;
use thalamus_core::errors::{EmbeddingError, RetrievalError, ThalamusError, ThalamusResult};
use thalamus_core::models::{
    FusionMethod, RetrievalMetadata, RetrievalResponse, ScoredPoint, SparseVector,
};
use thalamus_core::traits::{IMetricsSink, IPointStore, IReranker, NullMetricsSink};
use thalamus_embeddings::EmbeddingMatcher;
use tracing::{debug, warn};

use crate::fusion::{dbsf_fuse, rrf_fuse};

pub struct HybridRetriever {
    matcher: Arc<EmbeddingMatcher>,
    store: Arc<dyn IPointStore>,
    reranker: Option<Arc<dyn IReranker>>,
    metrics: Arc<dyn IMetricsSink>,
    config: RetrievalConfig,
    /// Fusion policy resolved once from configuration.
    fusion: FusionMethod,
}

impl HybridRetriever {
    pub fn new(
        matcher: Arc<EmbeddingMatcher>,
        store: Arc<dyn IPointStore>,
        config: RetrievalConfig,
    ) -> Self {
        let fusion = match config.fusion_method.as_str() {
            "rrf" => FusionMethod::Rrf,
            "dbsf" => FusionMethod::Dbsf,
            other => {
                warn!(fusion_method = other, "unknown fusion method, using rrf");
                FusionMethod::Rrf
            }
        };
        Self {
            matcher,
            store,
            reranker: None,
            metrics: Arc::new(NullMetricsSink),
            config,
            fusion,
        }
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn IReranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn IMetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The fusion policy a healthy hybrid call will report.
    pub fn fusion_method(&self) -> FusionMethod {
        self.fusion
    }

    /// Run the retrieval pipeline. Always returns a response; failures
    /// step down the ladder instead of raising.
    pub async fn retrieve(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&serde_json::Value>,
    ) -> RetrievalResponse {
        let started = Instant::now();

        let mut response = if limit == 0 {
            RetrievalResponse::empty(self.fusion, self.base_metadata())
        } else if !self.config.hybrid_enabled || !self.matcher.sparse_available() {
            debug!(
                hybrid_enabled = self.config.hybrid_enabled,
                sparse_available = self.matcher.sparse_available(),
                "hybrid unavailable, serving dense-only"
            );
            self.dense_only(query, limit, filter, None).await
        } else {
            self.hybrid(query, limit, filter).await
        };

        response.latency_ms = started.elapsed().as_secs_f64() * 1_000.0;
        self.record(&response);
        response
    }

    async fn hybrid(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&serde_json::Value>,
    ) -> RetrievalResponse {
        let dense_query = match self.encode_dense(query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "dense encoding failed, retrying dense-only");
                return self
                    .dense_only(
                        query,
                        limit,
                        filter,
                        Some(format!("dense encoding failed: {e}")),
                    )
                    .await;
            }
        };
        // A failed sparse arm never fails the call: the dense arm keeps
        // its influence through the configured fusion.
        let sparse_query = match self.encode_sparse(query).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(error = %e, "sparse encoding failed, fusing dense arm alone");
                None
            }
        };

        let wanted = prefetch_limit(limit, self.config.prefetch_multiplier);
        let collection = self.config.collection.as_str();

        let dense_arm = self.bounded(
            "dense prefetch",
            self.store.dense_search(collection, &dense_query, wanted, filter),
        );
        let sparse_arm = async {
            match &sparse_query {
                Some(sparse) => {
                    self.bounded(
                        "sparse prefetch",
                        self.store.sparse_search(collection, sparse, wanted, filter),
                    )
                    .await
                }
                None => Ok(Vec::new()),
            }
        };
        let (dense_result, sparse_result) = tokio::join!(dense_arm, sparse_arm);

        let dense_list = match dense_result {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "dense prefetch failed, retrying dense-only");
                return self
                    .dense_only(
                        query,
                        limit,
                        filter,
                        Some(format!("dense prefetch failed: {e}")),
                    )
                    .await;
            }
        };
        let sparse_list = match sparse_result {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "sparse prefetch failed, fusing dense arm alone");
                Vec::new()
            }
        };

        let mut metadata = self.base_metadata();
        metadata.sparse_candidates = sparse_list.len();
        metadata.dense_candidates = dense_list.len();
        debug!(
            sparse_candidates = metadata.sparse_candidates,
            dense_candidates = metadata.dense_candidates,
            fusion = %self.fusion,
            "fusing prefetched candidates"
        );

        let lists = [sparse_list, dense_list];
        let fused = match self.fusion {
            FusionMethod::Dbsf => dbsf_fuse(&lists, limit),
            _ => rrf_fuse(&lists, self.config.rrf_k, limit),
        };

        let mut response = RetrievalResponse::ranked(fused, self.fusion, metadata);
        if self.config.rerank_enabled {
            if let Some(reranker) = &self.reranker {
                response.reranked = self
                    .try_rerank(query, &mut response.points, reranker.as_ref())
                    .await;
                if response.reranked {
                    response.scores = response.points.iter().map(|p| p.score).collect();
                }
            }
        }
        response
    }

    /// Dense-only rung of the ladder. `note` carries the reason the
    /// hybrid path collapsed; it surfaces only if this rung also fails.
    async fn dense_only(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&serde_json::Value>,
        note: Option<String>,
    ) -> RetrievalResponse {
        let dense_query = match self.encode_dense(query).await {
            Ok(vector) => vector,
            Err(e) => return self.failed(note, format!("dense encoding failed: {e}")),
        };
        let result = self
            .bounded(
                "dense search",
                self.store
                    .dense_search(self.config.collection.as_str(), &dense_query, limit, filter),
            )
            .await;
        match result {
            Ok(mut points) => {
                points.truncate(limit);
                let mut metadata = self.base_metadata();
                metadata.dense_candidates = points.len();
                RetrievalResponse::ranked(points, FusionMethod::DenseOnly, metadata)
            }
            Err(e) => self.failed(note, format!("dense search failed: {e}")),
        }
    }

    /// Bottom of the ladder: empty result, `none`, error note attached.
    fn failed(&self, note: Option<String>, error: String) -> RetrievalResponse {
        let joined = match note {
            Some(note) => format!("{note}; {error}"),
            None => error,
        };
        warn!(error = %joined, "retrieval fully degraded, returning empty result");
        let mut metadata = self.base_metadata();
        metadata.error = Some(joined);
        RetrievalResponse::empty(FusionMethod::None, metadata)
    }

    /// Rerank fused candidates in place. Returns whether the order now
    /// reflects reranker scores; any failure keeps the fused order.
    async fn try_rerank(
        &self,
        query: &str,
        points: &mut Vec<ScoredPoint>,
        reranker: &dyn IReranker,
    ) -> bool {
        if points.is_empty() {
            return false;
        }

        // Candidates without text under the configured payload field
        // cannot be rescored; they keep fused order behind the rest.
        let mut slots: Vec<usize> = Vec::new();
        let mut candidates: Vec<String> = Vec::new();
        for (slot, point) in points.iter().enumerate() {
            if let Some(text) = point
                .payload
                .get(self.config.payload_text_field.as_str())
                .and_then(|v| v.as_str())
            {
                slots.push(slot);
                candidates.push(text.to_string());
            }
        }
        if candidates.is_empty() {
            debug!(
                field = %self.config.payload_text_field,
                "no candidate carries rerankable text, keeping fused order"
            );
            return false;
        }

        let outcome = tokio::time::timeout(
            Duration::from_millis(self.config.rerank_timeout_ms),
            reranker.rescore(query, &candidates),
        )
        .await;
        let rescored = match outcome {
            Ok(Ok(scores)) => scores,
            Ok(Err(e)) => {
                warn!(reranker = reranker.name(), error = %e, "rerank failed, keeping fused order");
                return false;
            }
            Err(_) => {
                warn!(
                    reranker = reranker.name(),
                    timeout_ms = self.config.rerank_timeout_ms,
                    "rerank timed out, keeping fused order"
                );
                return false;
            }
        };
        if rescored.len() != candidates.len() {
            warn!(
                expected = candidates.len(),
                actual = rescored.len(),
                "reranker returned wrong score count, keeping fused order"
            );
            return false;
        }

        let score_by_slot: HashMap<usize, f32> =
            slots.into_iter().zip(rescored).collect();
        let mut front: Vec<ScoredPoint> = Vec::with_capacity(points.len());
        let mut tail: Vec<ScoredPoint> = Vec::new();
        for (slot, mut point) in std::mem::take(points).into_iter().enumerate() {
            match score_by_slot.get(&slot) {
                Some(&score) => {
                    point.score = score;
                    front.push(point);
                }
                None => tail.push(point),
            }
        }
        front.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        front.extend(tail);
        *points = front;
        true
    }

    async fn encode_dense(&self, query: &str) -> ThalamusResult<Vec<f32>> {
        let matcher = Arc::clone(&self.matcher);
        let text = query.to_string();
        // Encoders are synchronous (and may block on a remote call);
        // keep them off the async worker threads.
        tokio::task::spawn_blocking(move || matcher.embed(&text))
            .await
            .map_err(|e| {
                ThalamusError::from(EmbeddingError::InferenceFailed {
                    reason: format!("encoder task failed: {e}"),
                })
            })?
    }

    async fn encode_sparse(&self, query: &str) -> ThalamusResult<SparseVector> {
        let matcher = Arc::clone(&self.matcher);
        let text = query.to_string();
        tokio::task::spawn_blocking(move || matcher.embed_sparse(&text))
            .await
            .map_err(|e| {
                ThalamusError::from(EmbeddingError::InferenceFailed {
                    reason: format!("encoder task failed: {e}"),
                })
            })?
    }

    /// Apply the configured per-call deadline to one backend wait.
    async fn bounded<T, F>(&self, stage: &str, fut: F) -> ThalamusResult<T>
    where
        F: Future<Output = ThalamusResult<T>>,
    {
        match self.config.deadline_ms {
            Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), fut).await {
                Ok(result) => result,
                Err(_) => Err(RetrievalError::DeadlineExceeded {
                    stage: stage.to_string(),
                }
                .into()),
            },
            None => fut.await,
        }
    }

    fn base_metadata(&self) -> RetrievalMetadata {
        RetrievalMetadata {
            collection: self.config.collection.clone(),
            ..Default::default()
        }
    }

    fn record(&self, response: &RetrievalResponse) {
        let labels = [
            ("collection", self.config.collection.as_str()),
            ("fusion_method", response.fusion_method.as_str()),
            ("reranked", if response.reranked { "true" } else { "false" }),
        ];
        self.metrics
            .incr_counter("retrieval_requests_total", &labels, 1);
        self.metrics
            .observe_histogram("retrieval_latency_ms", &labels, response.latency_ms);
        self.metrics
            .observe_histogram("retrieval_results", &labels, response.points.len() as f64);
    }
}

/// Per-arm prefetch depth: `limit × multiplier`, capped, never below
/// the request limit itself.
fn prefetch_limit(limit: usize, multiplier: usize) -> usize {
    limit
        .saturating_mul(multiplier.max(1))
        .min(MAX_PREFETCH_LIMIT)
        .max(limit)
}
