//! Capability seams. Real backends and deterministic fallbacks both
//! implement these; the composition root picks per configuration.

mod encoder;
mod metrics;
mod point_store;
mod reranker;

pub use encoder::{IDenseEncoder, ISparseEncoder};
pub use metrics::{IMetricsSink, NullMetricsSink};
pub use point_store::IPointStore;
pub use reranker::IReranker;
