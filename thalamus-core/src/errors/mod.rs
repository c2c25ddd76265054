//! Per-subsystem error enums and the workspace-wide aggregate.

mod config_error;
mod embedding_error;
mod prior_error;
mod retrieval_error;
mod routing_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use prior_error::PriorError;
pub use retrieval_error::RetrievalError;
pub use routing_error::RoutingError;

/// Top-level error type aggregating all subsystems.
#[derive(Debug, thiserror::Error)]
pub enum ThalamusError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Prior(#[from] PriorError),
}

/// Convenience alias used across the workspace.
pub type ThalamusResult<T> = Result<T, ThalamusError>;
