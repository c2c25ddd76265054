/// Retrieval subsystem errors. These never escape `retrieve()`; they
/// travel between the engine and its backends and end up absorbed into
/// the degradation ladder.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("rerank failed: {reason}")]
    RerankFailed { reason: String },

    #[error("deadline exceeded during {stage}")]
    DeadlineExceeded { stage: String },
}
