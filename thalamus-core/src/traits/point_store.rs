use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ThalamusResult;
use crate::models::{ScoredPoint, SparseVector};

/// Read-only client for the external vector store. The index, its
/// schema, and any filter language belong to the store; filters pass
/// through unchanged.
#[async_trait]
pub trait IPointStore: Send + Sync {
    /// Ranked dense-similarity search over a collection.
    async fn dense_search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
        filter: Option<&serde_json::Value>,
    ) -> ThalamusResult<Vec<ScoredPoint>>;

    /// Ranked sparse (lexical) search over a collection.
    async fn sparse_search(
        &self,
        collection: &str,
        query: &SparseVector,
        limit: usize,
        filter: Option<&serde_json::Value>,
    ) -> ThalamusResult<Vec<ScoredPoint>>;
}

#[async_trait]
impl<T: IPointStore + ?Sized> IPointStore for Arc<T> {
    async fn dense_search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
        filter: Option<&serde_json::Value>,
    ) -> ThalamusResult<Vec<ScoredPoint>> {
        (**self).dense_search(collection, query, limit, filter).await
    }

    async fn sparse_search(
        &self,
        collection: &str,
        query: &SparseVector,
        limit: usize,
        filter: Option<&serde_json::Value>,
    ) -> ThalamusResult<Vec<ScoredPoint>> {
        (**self).sparse_search(collection, query, limit, filter).await
    }
}
