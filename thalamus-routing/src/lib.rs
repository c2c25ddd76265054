//! Semantic routing cache.
//!
//! Reuses routing decisions across queries that mean the same thing:
//! lookups match on embedding cosine similarity within a hard context
//! partition. Includes shadow mode for validating hit quality before
//! the cache is allowed to alter live routing.

pub mod cache;
pub mod digest;

pub use cache::SemanticRouteCache;
pub use digest::context_digest;
