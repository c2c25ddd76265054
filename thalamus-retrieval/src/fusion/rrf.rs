//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines ranked lists from different retrieval methods without
//! requiring their raw scores to be comparable. `k` dampens the
//! influence of top ranks from any single list.

use thalamus_core::models::ScoredPoint;

use super::FusionAccumulator;

/// Fuse ranked candidate lists using Reciprocal Rank Fusion.
///
/// Ranks are 1-based: the head of each list contributes `1/(k + 1)`.
/// A point appearing in several lists sums its contributions; ties
/// resolve to the point encountered first. Raw input scores are only
/// used for the ordering the lists already carry.
pub fn rrf_fuse(lists: &[Vec<ScoredPoint>], k: u32, limit: usize) -> Vec<ScoredPoint> {
    let mut acc = FusionAccumulator::new();

    for list in lists {
        for (rank, point) in list.iter().enumerate() {
            let contribution = 1.0 / (k as f64 + rank as f64 + 1.0);
            acc.add(point, contribution);
        }
    }

    acc.finalize(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, score: f32) -> ScoredPoint {
        ScoredPoint::new(id, score)
    }

    #[test]
    fn single_list_preserves_order() {
        let list = vec![point("a", 0.9), point("b", 0.5), point("c", 0.1)];
        let fused = rrf_fuse(&[list], 60, 10);
        let ids: Vec<&str> = fused.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn shared_point_outranks_single_list_heads() {
        // "both" sits at rank 2 in each list but accumulates two
        // contributions, beating every rank-1 singleton at k=60.
        let sparse = vec![point("s1", 10.0), point("both", 8.0)];
        let dense = vec![point("d1", 0.99), point("both", 0.95)];
        let fused = rrf_fuse(&[sparse, dense], 60, 10);
        assert_eq!(fused[0].id, "both");
        let expected = 2.0 / 62.0;
        assert!((fused[0].score as f64 - expected).abs() < 1e-6);
    }

    #[test]
    fn no_duplicate_ids() {
        let a = vec![point("x", 1.0), point("y", 0.5)];
        let b = vec![point("y", 0.9), point("x", 0.8)];
        let fused = rrf_fuse(&[a, b], 60, 10);
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn ties_keep_encounter_order() {
        // Same rank in disjoint lists gives identical scores; "first"
        // comes from the list scanned first.
        let a = vec![point("first", 1.0)];
        let b = vec![point("second", 1.0)];
        let fused = rrf_fuse(&[a, b], 60, 10);
        assert_eq!(fused[0].id, "first");
        assert_eq!(fused[1].id, "second");
        assert_eq!(fused[0].score, fused[1].score);
    }

    #[test]
    fn truncates_after_sorting() {
        // "y" trails "x" in the first list but picks up a second
        // contribution, so limit=1 must keep "y", not the first seen.
        let a = vec![point("x", 1.0), point("y", 0.5)];
        let b = vec![point("y", 0.9)];
        let fused = rrf_fuse(&[a, b], 60, 1);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].id, "y");
    }

    #[test]
    fn empty_input_yields_empty() {
        assert!(rrf_fuse(&[], 60, 10).is_empty());
        assert!(rrf_fuse(&[vec![]], 60, 10).is_empty());
    }
}
