//! Cold-start prior resolution.
//!
//! Resolution walks sources from most to least informative: exact
//! benchmark entry (context-narrowed when one exists), the
//! cross-tenant pool when sharing is enabled, family inheritance with
//! a compounding per-hop discount, and finally the uniform prior.
//! Resolved priors are cached; recording an outcome invalidates the
//! affected model's cached resolutions.

use dashmap::DashMap;

use thalamus_core::config::PriorConfig;
use thalamus_core::constants::{
    FAMILY_CONFIDENCE_DISCOUNT, FAMILY_MEAN_REGRESSION, FAMILY_VARIANCE_INFLATION,
    PRIOR_VARIANCE_MAX,
};
use thalamus_core::models::{ModelPrior, PriorSource};
use tracing::debug;

use crate::benchmark::BenchmarkTable;
use crate::beta;
use crate::family::FamilyGraph;

/// Running reward aggregate, Welford form.
#[derive(Debug, Default, Clone)]
pub(crate) struct RewardAggregate {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RewardAggregate {
    fn push(&mut self, reward: f64) {
        self.count += 1;
        let delta = reward - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (reward - self.mean);
    }

    fn variance(&self) -> f64 {
        if self.count < 2 {
            return PRIOR_VARIANCE_MAX;
        }
        self.m2 / self.count as f64
    }
}

/// Cold-start prior service. Benchmark table and family graph are
/// immutable; the caches are concurrent maps.
pub struct ColdStartPriors {
    benchmarks: BenchmarkTable,
    family: FamilyGraph,
    config: PriorConfig,
    /// Resolved priors keyed by (model, context, tenant).
    resolved: DashMap<(String, String, String), ModelPrior>,
    /// Observed rewards pooled across tenants, keyed by model.
    cross_tenant: DashMap<String, RewardAggregate>,
}

impl ColdStartPriors {
    pub fn new(config: &PriorConfig) -> Self {
        let benchmarks = match config.benchmark_path.as_deref() {
            Some(path) => BenchmarkTable::load(path),
            None => BenchmarkTable::empty(),
        };
        let family = FamilyGraph::new(config.family.clone());
        Self::with_tables(benchmarks, family, config.clone())
    }

    /// Inject pre-built tables, bypassing file loading.
    pub fn with_tables(benchmarks: BenchmarkTable, family: FamilyGraph, config: PriorConfig) -> Self {
        Self {
            benchmarks,
            family,
            config,
            resolved: DashMap::new(),
            cross_tenant: DashMap::new(),
        }
    }

    /// Beta(alpha, beta) initialization parameters for one model arm.
    pub fn get_prior_for_model(
        &self,
        model: &str,
        context: Option<&str>,
        tenant: &str,
    ) -> (f64, f64) {
        let prior = self.resolve(model, context, tenant);
        beta::to_beta_params(prior.mean, prior.confidence, self.config.max_effective_samples)
    }

    /// The resolved mean reward alone.
    pub fn get_mean_reward_prior(&self, model: &str, context: Option<&str>, tenant: &str) -> f64 {
        self.resolve(model, context, tenant).mean
    }

    /// Central credible interval of the converted prior.
    pub fn credible_interval(
        &self,
        model: &str,
        context: Option<&str>,
        tenant: &str,
        level: f64,
    ) -> (f64, f64) {
        let (alpha, beta_param) = self.get_prior_for_model(model, context, tenant);
        beta::credible_interval(alpha, beta_param, level)
    }

    /// Resolve the full prior with provenance, consulting the cache.
    pub fn resolve(&self, model: &str, context: Option<&str>, tenant: &str) -> ModelPrior {
        let key = (
            model.to_string(),
            context.unwrap_or("").to_string(),
            tenant.to_string(),
        );
        if let Some(cached) = self.resolved.get(&key) {
            return cached.clone();
        }
        let prior = self.resolve_fresh(model, context);
        debug!(
            model,
            context = context.unwrap_or(""),
            tenant,
            source = prior.source.as_str(),
            mean = prior.mean,
            confidence = prior.confidence,
            hops = prior.inherited_hops,
            "resolved cold-start prior"
        );
        self.resolved.insert(key, prior.clone());
        prior
    }

    fn resolve_fresh(&self, model: &str, context: Option<&str>) -> ModelPrior {
        if let Some(prior) = self.direct_prior(model, context) {
            return prior;
        }
        for (hops, ancestor) in self.family.ancestors(model).into_iter().enumerate() {
            if let Some(base) = self.direct_prior(ancestor, context) {
                return self.discounted(model, base, hops + 1);
            }
        }
        ModelPrior::uniform(model)
    }

    /// Sources carrying data about this exact model id.
    fn direct_prior(&self, model: &str, context: Option<&str>) -> Option<ModelPrior> {
        if let Some(entry) = self.benchmarks.get(model) {
            if let Some(sub) = context.and_then(|c| entry.contexts.get(c)) {
                let (mean, variance) = beta::normalize_moments(sub.mean_reward, sub.variance);
                return Some(ModelPrior {
                    model: model.to_string(),
                    mean,
                    variance,
                    confidence: beta::confidence_from_samples(sub.sample_count),
                    source: PriorSource::ContextBenchmark,
                    inherited_hops: 0,
                });
            }
            let (mean, variance) = beta::normalize_moments(entry.mean_reward, entry.variance);
            return Some(ModelPrior {
                model: model.to_string(),
                mean,
                variance,
                confidence: beta::confidence_from_samples(entry.sample_count),
                source: PriorSource::Benchmark,
                inherited_hops: 0,
            });
        }
        if self.config.cross_tenant_enabled {
            if let Some(aggregate) = self.cross_tenant.get(model) {
                if aggregate.count > 0 {
                    let (mean, variance) =
                        beta::normalize_moments(aggregate.mean, aggregate.variance());
                    return Some(ModelPrior {
                        model: model.to_string(),
                        mean,
                        variance,
                        confidence: beta::confidence_from_samples(aggregate.count),
                        source: PriorSource::CrossTenant,
                        inherited_hops: 0,
                    });
                }
            }
        }
        None
    }

    /// Family discount, compounding per hop: regress the mean toward
    /// 0.5, inflate variance (capped), and shrink confidence.
    fn discounted(&self, model: &str, base: ModelPrior, hops: usize) -> ModelPrior {
        let mut mean = base.mean;
        let mut variance = base.variance;
        let mut confidence = base.confidence;
        for _ in 0..hops {
            mean = 0.5 + (mean - 0.5) * (1.0 - FAMILY_MEAN_REGRESSION);
            variance = (variance * FAMILY_VARIANCE_INFLATION).min(PRIOR_VARIANCE_MAX);
            confidence *= FAMILY_CONFIDENCE_DISCOUNT;
        }
        ModelPrior {
            model: model.to_string(),
            mean,
            variance,
            confidence,
            source: PriorSource::FamilyInheritance,
            inherited_hops: hops,
        }
    }

    /// Feed an observed reward into the cross-tenant pool and drop the
    /// model's cached resolutions. A no-op unless sharing is enabled.
    pub fn record_outcome(&self, model: &str, tenant: &str, reward: f64) {
        if !self.config.cross_tenant_enabled {
            return;
        }
        if !reward.is_finite() {
            debug!(model, tenant, reward, "ignoring non-finite reward");
            return;
        }
        let reward = reward.clamp(0.0, 1.0);
        self.cross_tenant
            .entry(model.to_string())
            .or_default()
            .push(reward);
        self.resolved.retain(|key, _| key.0 != model);
        debug!(model, tenant, reward, "recorded cross-tenant outcome");
    }

    pub fn benchmark_count(&self) -> usize {
        self.benchmarks.len()
    }
}
