//! Distribution-Based Score Fusion: rescale each list to [0, 1] using a
//! 3-sigma window around its mean, then sum contributions per point.
//!
//! Unlike RRF this keeps the shape of each score distribution, so a
//! dense hit that is far ahead of its peers stays far ahead after
//! fusion. Scores outside the window clamp to its edges.

use thalamus_core::models::ScoredPoint;

use super::FusionAccumulator;

/// Fuse candidate lists using Distribution-Based Score Fusion.
///
/// Each list is normalized independently: scores clamp to
/// `mean ± 3σ` (population σ) and rescale linearly onto [0, 1]. A list
/// with zero spread contributes 0.5 for every member. Contributions sum
/// per point; ties resolve to the point encountered first.
pub fn dbsf_fuse(lists: &[Vec<ScoredPoint>], limit: usize) -> Vec<ScoredPoint> {
    let mut acc = FusionAccumulator::new();

    for list in lists {
        if list.is_empty() {
            continue;
        }

        let n = list.len() as f64;
        let mean = list.iter().map(|p| p.score as f64).sum::<f64>() / n;
        let variance = list
            .iter()
            .map(|p| {
                let d = p.score as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let sigma = variance.sqrt();

        let lo = mean - 3.0 * sigma;
        let hi = mean + 3.0 * sigma;
        let span = hi - lo;

        for point in list {
            let contribution = if span <= f64::EPSILON {
                0.5
            } else {
                ((point.score as f64).clamp(lo, hi) - lo) / span
            };
            acc.add(point, contribution);
        }
    }

    acc.finalize(limit)
}
