//! Hybrid retrieval engine.
//!
//! Prefetches sparse and dense candidates from an external point
//! store, fuses them (RRF or DBSF), optionally reranks the fused head,
//! and degrades stepwise instead of failing: hybrid → dense-only →
//! empty. See [`HybridRetriever::retrieve`] for the ladder.

pub mod engine;
pub mod fusion;
pub mod rerank;

pub use engine::HybridRetriever;
pub use rerank::RemoteReranker;
