//! Beta-parameter conversion for reward priors, via `statrs`.
//!
//! A resolved prior carries (mean, variance, confidence); conversion
//! turns confidence into pseudo-observations: n = confidence × ceiling,
//! split as alpha = mean×n, beta = (1−mean)×n. Fewer than two effective
//! samples is no information at all and collapses to Beta(1, 1).

use statrs::distribution::{Beta, ContinuousCDF};
use thalamus_core::constants::{
    CONFIDENCE_SAMPLE_HALF_LIFE, MIN_EFFECTIVE_SAMPLES, PRIOR_MEAN_MAX, PRIOR_MEAN_MIN,
    PRIOR_VARIANCE_MAX, PRIOR_VARIANCE_MIN,
};

/// Clamp raw (mean, variance) moments into their legal ranges.
/// Non-finite input falls back to the uniform moments.
pub fn normalize_moments(mean: f64, variance: f64) -> (f64, f64) {
    let mean = if mean.is_finite() {
        mean.clamp(PRIOR_MEAN_MIN, PRIOR_MEAN_MAX)
    } else {
        0.5
    };
    let variance = if variance.is_finite() {
        variance.clamp(PRIOR_VARIANCE_MIN, PRIOR_VARIANCE_MAX)
    } else {
        PRIOR_VARIANCE_MAX
    };
    (mean, variance)
}

/// Observation count → confidence in [0, 1): n / (n + 500).
/// 500 samples give confidence 0.5.
pub fn confidence_from_samples(samples: u64) -> f64 {
    let n = samples as f64;
    n / (n + CONFIDENCE_SAMPLE_HALF_LIFE)
}

/// Convert (mean, confidence) into Beta(alpha, beta) evidence.
///
/// `max_effective_samples` caps how many pseudo-observations full
/// confidence is worth. Both outputs are floored at 1.0 so the
/// distribution always stays proper.
pub fn to_beta_params(mean: f64, confidence: f64, max_effective_samples: f64) -> (f64, f64) {
    if !mean.is_finite() || !confidence.is_finite() {
        return (1.0, 1.0);
    }
    let ceiling = if max_effective_samples.is_finite() {
        max_effective_samples.max(0.0)
    } else {
        0.0
    };
    let mean = mean.clamp(PRIOR_MEAN_MIN, PRIOR_MEAN_MAX);
    let n = confidence.clamp(0.0, 1.0) * ceiling;
    if n < MIN_EFFECTIVE_SAMPLES {
        return (1.0, 1.0);
    }
    let alpha = (mean * n).max(1.0);
    let beta = ((1.0 - mean) * n).max(1.0);
    (alpha, beta)
}

/// Central credible interval of Beta(alpha, beta) containing `level`
/// probability mass. Returns (0, 1) for parameters statrs rejects.
pub fn credible_interval(alpha: f64, beta: f64, level: f64) -> (f64, f64) {
    if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
        return (0.0, 1.0);
    }
    let tail = (1.0 - level.clamp(0.0, 1.0)) / 2.0;
    match Beta::new(alpha, beta) {
        Ok(dist) => {
            let low = dist.inverse_cdf(tail);
            let high = dist.inverse_cdf(1.0 - tail);
            (
                if low.is_finite() { low.clamp(0.0, 1.0) } else { 0.0 },
                if high.is_finite() { high.clamp(0.0, 1.0) } else { 1.0 },
            )
        }
        Err(_) => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_benchmark_prior_converts_to_scaled_evidence() {
        let (alpha, beta) = to_beta_params(0.8, 0.5, 100.0);
        assert!((alpha - 40.0).abs() < 1e-10);
        assert!((beta - 10.0).abs() < 1e-10);
    }

    #[test]
    fn thin_confidence_collapses_to_uniform() {
        assert_eq!(to_beta_params(0.8, 0.01, 100.0), (1.0, 1.0));
        assert_eq!(to_beta_params(0.8, 0.0, 100.0), (1.0, 1.0));
    }

    #[test]
    fn mean_is_clamped_before_conversion() {
        let (alpha, beta) = to_beta_params(1.3, 0.5, 100.0);
        assert!((alpha - 0.99 * 50.0).abs() < 1e-10);
        // (1 - 0.99) × 50 = 0.5, floored to keep the distribution proper.
        assert_eq!(beta, 1.0);
    }

    #[test]
    fn non_finite_inputs_are_uninformative() {
        assert_eq!(to_beta_params(f64::NAN, 0.9, 100.0), (1.0, 1.0));
        assert_eq!(to_beta_params(0.8, f64::INFINITY, 100.0), (1.0, 1.0));
        assert_eq!(to_beta_params(0.8, 0.9, f64::NAN), (1.0, 1.0));
    }

    #[test]
    fn normalize_moments_clamps_both_ranges() {
        assert_eq!(normalize_moments(0.0, 0.0), (0.01, 0.001));
        assert_eq!(normalize_moments(1.0, 0.5), (0.99, 0.25));
        let (mean, variance) = normalize_moments(0.7, 0.02);
        assert_eq!((mean, variance), (0.7, 0.02));
    }

    #[test]
    fn normalize_moments_survives_nan() {
        let (mean, variance) = normalize_moments(f64::NAN, f64::NAN);
        assert_eq!(mean, 0.5);
        assert_eq!(variance, PRIOR_VARIANCE_MAX);
    }

    #[test]
    fn confidence_grows_with_samples() {
        assert_eq!(confidence_from_samples(0), 0.0);
        assert!((confidence_from_samples(500) - 0.5).abs() < 1e-10);
        assert!(confidence_from_samples(100) < confidence_from_samples(1_000));
        assert!(confidence_from_samples(1_000_000) < 1.0);
    }

    #[test]
    fn credible_interval_brackets_the_mean() {
        let (low, high) = credible_interval(40.0, 10.0, 0.95);
        let mean = 40.0 / 50.0;
        assert!(low > 0.0 && high < 1.0);
        assert!(low < mean && mean < high);
    }

    #[test]
    fn credible_interval_rejects_bad_parameters() {
        assert_eq!(credible_interval(0.0, 5.0, 0.95), (0.0, 1.0));
        assert_eq!(credible_interval(f64::NAN, 5.0, 0.95), (0.0, 1.0));
    }
}
