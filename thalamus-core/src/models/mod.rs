//! Domain records shared across the workspace.

mod degradation_event;
mod prior;
mod retrieval;
mod routing;
mod sparse_vector;

pub use degradation_event::DegradationEvent;
pub use prior::{BenchmarkEntry, ContextBenchmark, ModelPrior, PriorSource};
pub use retrieval::{FusionMethod, RetrievalMetadata, RetrievalResponse, ScoredPoint};
pub use routing::{CachedRoute, RequestContext, RouteCacheStats, RoutingDecision};
pub use sparse_vector::SparseVector;
