use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where a prior's moments came from, most specific first. Carried on
/// every resolved prior as its degradation indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorSource {
    Benchmark,
    ContextBenchmark,
    CrossTenant,
    FamilyInheritance,
    Uniform,
}

impl PriorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorSource::Benchmark => "benchmark",
            PriorSource::ContextBenchmark => "context_benchmark",
            PriorSource::CrossTenant => "cross_tenant",
            PriorSource::FamilyInheritance => "family_inheritance",
            PriorSource::Uniform => "uniform",
        }
    }
}

/// A resolved reward prior for one model. Immutable once created; a
/// cross-tenant update invalidates it rather than editing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrior {
    pub model: String,
    pub mean: f64,
    pub variance: f64,
    /// Trust in the moments, in [0, 1]. Scales the Beta evidence.
    pub confidence: f64,
    pub source: PriorSource,
    /// Family hops between this model and the entry that supplied the
    /// moments. Zero for direct sources.
    pub inherited_hops: usize,
}

impl ModelPrior {
    /// The no-information prior: Beta(1, 1) after conversion.
    pub fn uniform(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            mean: 0.5,
            variance: 1.0 / 12.0,
            confidence: 0.0,
            source: PriorSource::Uniform,
            inherited_hops: 0,
        }
    }
}

/// One row of the static benchmark table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub mean_reward: f64,
    pub variance: f64,
    pub sample_count: u64,
    /// Narrower per-context measurements, keyed by context id.
    #[serde(default)]
    pub contexts: HashMap<String, ContextBenchmark>,
}

/// A context-narrowed benchmark measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBenchmark {
    pub mean_reward: f64,
    pub variance: f64,
    pub sample_count: u64,
}
