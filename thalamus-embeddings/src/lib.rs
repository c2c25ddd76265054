//! # thalamus-embeddings
//!
//! Embedding similarity matcher: config-driven encoder construction
//! with an always-available hashed fallback, a degradation-event log,
//! and a blake3-keyed query-embedding cache.

pub mod chain;
pub mod matcher;
pub mod providers;
pub mod similarity;

pub use matcher::EmbeddingMatcher;
