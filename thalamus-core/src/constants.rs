/// Thalamus system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard cap on candidates requested from either search arm.
pub const MAX_PREFETCH_LIMIT: usize = 1_000;

/// Maximum family-inheritance hops when resolving a prior.
pub const MAX_FAMILY_DEPTH: usize = 4;

/// Fraction by which an inherited mean regresses toward 0.5 per hop.
pub const FAMILY_MEAN_REGRESSION: f64 = 0.2;

/// Factor by which an inherited variance inflates per hop.
pub const FAMILY_VARIANCE_INFLATION: f64 = 1.3;

/// Factor by which confidence shrinks per inheritance hop.
pub const FAMILY_CONFIDENCE_DISCOUNT: f64 = 0.7;

/// Clamp range for prior means.
pub const PRIOR_MEAN_MIN: f64 = 0.01;
pub const PRIOR_MEAN_MAX: f64 = 0.99;

/// Clamp range for prior variances.
pub const PRIOR_VARIANCE_MIN: f64 = 0.001;
pub const PRIOR_VARIANCE_MAX: f64 = 0.25;

/// Effective sample counts below this carry no usable information.
pub const MIN_EFFECTIVE_SAMPLES: f64 = 2.0;

/// Sample count at which benchmark confidence reaches 0.5.
pub const CONFIDENCE_SAMPLE_HALF_LIFE: f64 = 500.0;
