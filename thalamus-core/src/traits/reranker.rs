use async_trait::async_trait;

use crate::errors::ThalamusResult;

/// Relevance rescoring backend. One shape for a remote scoring API and
/// a local cross-encoder.
#[async_trait]
pub trait IReranker: Send + Sync {
    /// Score each candidate against the query. Returns one score per
    /// candidate, in candidate order.
    async fn rescore(&self, query: &str, candidates: &[String]) -> ThalamusResult<Vec<f32>>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
