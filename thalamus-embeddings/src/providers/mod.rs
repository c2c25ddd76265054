//! Encoder implementations and config-driven construction.

mod hashed;
mod remote;

pub use hashed::{HashedDenseEncoder, HashedSparseEncoder};
pub use remote::{RemoteDenseEncoder, RemoteSparseEncoder};

use std::time::Duration;

use thalamus_core::config::EmbeddingConfig;
use thalamus_core::traits::{IDenseEncoder, ISparseEncoder};
use tracing::warn;

/// Dense providers in priority order. The hashed fallback is always
/// appended last so the chain can never be empty.
pub fn build_dense(config: &EmbeddingConfig) -> Vec<Box<dyn IDenseEncoder>> {
    let mut providers: Vec<Box<dyn IDenseEncoder>> = Vec::new();
    match config.dense_provider.as_str() {
        "remote" => match config.remote_endpoint.as_deref() {
            Some(endpoint) => {
                match RemoteDenseEncoder::new(
                    endpoint,
                    config.dimensions,
                    Duration::from_millis(config.remote_timeout_ms),
                ) {
                    Ok(encoder) => providers.push(Box::new(encoder)),
                    Err(err) => warn!(
                        error = %err,
                        "remote dense encoder unavailable, degrading to hashed fallback"
                    ),
                }
            }
            None => warn!(
                "dense_provider is \"remote\" but no remote_endpoint configured, \
                 degrading to hashed fallback"
            ),
        },
        "hashed" => {}
        other => warn!(provider = other, "unknown dense provider, using hashed fallback"),
    }
    providers.push(Box::new(HashedDenseEncoder::new(config.dimensions)));
    providers
}

/// The sparse encoder, or `None` when sparse search is switched off.
pub fn build_sparse(config: &EmbeddingConfig) -> Option<Box<dyn ISparseEncoder>> {
    match config.sparse_provider.as_str() {
        "off" => None,
        "remote" => match config.remote_endpoint.as_deref() {
            Some(endpoint) => match RemoteSparseEncoder::new(
                endpoint,
                config.sparse_vocab_size,
                Duration::from_millis(config.remote_timeout_ms),
            ) {
                Ok(encoder) => Some(Box::new(encoder)),
                Err(err) => {
                    warn!(error = %err, "remote sparse encoder unavailable, using hashed fallback");
                    Some(Box::new(HashedSparseEncoder::new(config.sparse_vocab_size)))
                }
            },
            None => {
                warn!("sparse_provider is \"remote\" but no remote_endpoint configured, using hashed fallback");
                Some(Box::new(HashedSparseEncoder::new(config.sparse_vocab_size)))
            }
        },
        "hashed" => Some(Box::new(HashedSparseEncoder::new(config.sparse_vocab_size))),
        other => {
            warn!(provider = other, "unknown sparse provider, using hashed fallback");
            Some(Box::new(HashedSparseEncoder::new(config.sparse_vocab_size)))
        }
    }
}
