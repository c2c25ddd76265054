//! Thalamus — retrieval and routing plumbing for model selection.
//!
//! Composition root over the workspace engines:
//!
//! - `thalamus-embeddings`: encoder chain and similarity matcher
//! - `thalamus-retrieval`: hybrid sparse+dense retrieval with fusion
//! - `thalamus-routing`: semantic route cache
//! - `thalamus-priors`: cold-start reward priors
//!
//! [`Thalamus::new`] wires the engines with explicit dependency
//! injection; [`init_global`] installs an instance behind a lazy
//! process-wide accessor for call sites that cannot thread it through.

pub mod logging;
pub mod runtime;

pub use runtime::{global, init_global, is_initialized, Thalamus};

pub use thalamus_core::config::ThalamusConfig;
pub use thalamus_core::errors::{ThalamusError, ThalamusResult};
pub use thalamus_core::models::{
    CachedRoute, FusionMethod, ModelPrior, PriorSource, RequestContext, RetrievalResponse,
    RouteCacheStats, RoutingDecision, ScoredPoint, SparseVector,
};
pub use thalamus_core::traits::{
    IDenseEncoder, IMetricsSink, IPointStore, IReranker, ISparseEncoder,
};
pub use thalamus_embeddings::EmbeddingMatcher;
pub use thalamus_priors::ColdStartPriors;
pub use thalamus_retrieval::{HybridRetriever, RemoteReranker};
pub use thalamus_routing::SemanticRouteCache;
