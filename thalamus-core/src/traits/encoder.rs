use crate::errors::ThalamusResult;
use crate::models::SparseVector;

/// Dense text encoder.
pub trait IDenseEncoder: Send + Sync {
    /// Encode a single text into a dense vector.
    fn embed(&self, text: &str) -> ThalamusResult<Vec<f32>>;

    /// Encode a batch of texts.
    fn embed_batch(&self, texts: &[String]) -> ThalamusResult<Vec<Vec<f32>>>;

    /// Output dimensionality.
    fn dimensions(&self) -> usize;

    /// Human-readable encoder name.
    fn name(&self) -> &str;

    /// Whether the encoder can currently serve requests.
    fn is_available(&self) -> bool;

    /// Whether vectors carry learned semantics. Hash-derived stand-ins
    /// return false; similarity over their output is not meaningful.
    fn is_semantic(&self) -> bool;
}

/// Sparse (lexical-weight) text encoder.
pub trait ISparseEncoder: Send + Sync {
    /// Encode a single text into a sparse vector.
    fn embed_sparse(&self, text: &str) -> ThalamusResult<SparseVector>;

    /// Size of the vocabulary the indices live in.
    fn vocab_size(&self) -> u32;

    /// Human-readable encoder name.
    fn name(&self) -> &str;

    /// Whether the encoder can currently serve requests.
    fn is_available(&self) -> bool;
}
