//! Embedding similarity matcher.
//!
//! One facade over the dense fallback chain, the optional sparse
//! encoder, and the query-embedding cache. Every engine in the
//! workspace shares a single matcher instance.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use thalamus_core::config::{defaults, EmbeddingConfig};
use thalamus_core::errors::{EmbeddingError, ThalamusResult};
use thalamus_core::models::{DegradationEvent, SparseVector};
use thalamus_core::traits::{IDenseEncoder, ISparseEncoder};
use tracing::debug;

use crate::chain::EncoderChain;
use crate::providers;
use crate::similarity;

const QUERY_CACHE_TTI_SECS: u64 = 3_600;

pub struct EmbeddingMatcher {
    chain: EncoderChain,
    sparse: Option<Box<dyn ISparseEncoder>>,
    query_cache: Cache<String, Arc<Vec<f32>>>,
}

impl EmbeddingMatcher {
    /// Build encoders from configuration. Construction cannot fail: an
    /// unreachable remote backend degrades to the hashed stand-in.
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self::with_encoders(
            providers::build_dense(config),
            providers::build_sparse(config),
            config.query_cache_size,
        )
    }

    /// Inject encoders directly, bypassing config-driven construction.
    /// The composition seam for callers with in-process model bindings.
    /// An empty dense list gets the hashed stand-in, so the chain is
    /// never empty.
    pub fn with_encoders(
        mut dense: Vec<Box<dyn IDenseEncoder>>,
        sparse: Option<Box<dyn ISparseEncoder>>,
        query_cache_size: u64,
    ) -> Self {
        if dense.is_empty() {
            dense.push(Box::new(providers::HashedDenseEncoder::new(
                defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            )));
        }
        Self {
            chain: EncoderChain::new(dense),
            sparse,
            query_cache: Cache::builder()
                .max_capacity(query_cache_size)
                .time_to_idle(Duration::from_secs(QUERY_CACHE_TTI_SECS))
                .build(),
        }
    }

    /// Embed non-empty text as a dense vector. Fails only on empty or
    /// whitespace input, or if every provider in the chain fails.
    pub fn embed(&self, text: &str) -> ThalamusResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput.into());
        }
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(cached) = self.query_cache.get(&key) {
            debug!(key = %key, "query embedding cache hit");
            return Ok(cached.as_ref().clone());
        }
        let (vector, _) = self.chain.embed(text)?;
        self.query_cache.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    /// Embed non-empty text as a sparse vector, when a sparse encoder
    /// is configured and available.
    pub fn embed_sparse(&self, text: &str) -> ThalamusResult<SparseVector> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput.into());
        }
        match &self.sparse {
            Some(encoder) if encoder.is_available() => encoder.embed_sparse(text),
            _ => Err(EmbeddingError::ProviderUnavailable {
                provider: "sparse".to_string(),
            }
            .into()),
        }
    }

    /// Cosine similarity in [-1, 1]; 0.0 for zero-norm inputs.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        similarity::cosine(a, b)
    }

    /// Whether the currently serving dense encoder carries learned
    /// semantics. False means similarity is not meaningful.
    pub fn is_semantic(&self) -> bool {
        self.chain.is_semantic()
    }

    pub fn sparse_available(&self) -> bool {
        self.sparse.as_ref().is_some_and(|s| s.is_available())
    }

    pub fn dimensions(&self) -> usize {
        self.chain.active().dimensions()
    }

    pub fn active_encoder(&self) -> &str {
        self.chain.active().name()
    }

    /// Drain degradation events recorded by the fallback chain.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }
}
