use std::collections::HashSet;

use proptest::prelude::*;
use thalamus_core::models::ScoredPoint;
use thalamus_retrieval::fusion::{dbsf_fuse, rrf_fuse};

/// A ranked list as a store would return it: unique ids, any scores.
fn arb_list() -> impl Strategy<Value = Vec<ScoredPoint>> {
    prop::collection::vec(("[a-e]{1,2}", 0.0f32..100.0), 0..12).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(id, _)| seen.insert(id.clone()))
            .map(|(id, score)| ScoredPoint::new(id, score))
            .collect()
    })
}

fn input_ids(lists: &[Vec<ScoredPoint>]) -> HashSet<String> {
    lists
        .iter()
        .flatten()
        .map(|p| p.id.clone())
        .collect()
}

proptest! {
    #[test]
    fn rrf_never_duplicates_and_respects_limit(
        a in arb_list(),
        b in arb_list(),
        limit in 0usize..10,
    ) {
        let lists = [a, b];
        let fused = rrf_fuse(&lists, 60, limit);

        prop_assert!(fused.len() <= limit);
        let ids: HashSet<&str> = fused.iter().map(|p| p.id.as_str()).collect();
        prop_assert_eq!(ids.len(), fused.len(), "duplicate id in fused output");
        let known = input_ids(&lists);
        for p in &fused {
            prop_assert!(known.contains(&p.id), "fabricated id {}", p.id);
        }
    }

    #[test]
    fn rrf_scores_are_positive_descending_and_bounded(
        a in arb_list(),
        b in arb_list(),
    ) {
        let lists = [a, b];
        let fused = rrf_fuse(&lists, 60, usize::MAX);

        let ceiling = lists.len() as f32 / 61.0;
        for window in fused.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
        for p in &fused {
            prop_assert!(p.score > 0.0);
            prop_assert!(p.score <= ceiling + f32::EPSILON);
        }
    }

    #[test]
    fn rrf_head_is_a_prefix_of_larger_limits(
        a in arb_list(),
        b in arb_list(),
        limit in 1usize..6,
    ) {
        let lists = [a, b];
        let small = rrf_fuse(&lists, 60, limit);
        let large = rrf_fuse(&lists, 60, limit + 5);

        prop_assert_eq!(&small[..], &large[..small.len()]);
    }

    #[test]
    fn dbsf_scores_stay_within_list_count(
        a in arb_list(),
        b in arb_list(),
    ) {
        let lists = [a, b];
        let fused = dbsf_fuse(&lists, usize::MAX);

        let ceiling = lists.len() as f32;
        for p in &fused {
            prop_assert!(p.score >= 0.0, "negative fused score {}", p.score);
            prop_assert!(p.score <= ceiling + f32::EPSILON, "fused score {} above {}", p.score, ceiling);
        }
    }

    #[test]
    fn dbsf_never_duplicates_and_respects_limit(
        a in arb_list(),
        b in arb_list(),
        limit in 0usize..10,
    ) {
        let lists = [a, b];
        let fused = dbsf_fuse(&lists, limit);

        prop_assert!(fused.len() <= limit);
        let ids: HashSet<&str> = fused.iter().map(|p| p.id.as_str()).collect();
        prop_assert_eq!(ids.len(), fused.len(), "duplicate id in fused output");
        let known = input_ids(&lists);
        for p in &fused {
            prop_assert!(known.contains(&p.id), "fabricated id {}", p.id);
        }
    }
}
