//! Score fusion for hybrid retrieval.
//!
//! Two strategies over the same candidate-merging core: Reciprocal Rank
//! Fusion (rank-based, scale-free) and Distribution-Based Score Fusion
//! (normalizes raw scores per list before summing).

pub mod dbsf;
pub mod rrf;

pub use dbsf::dbsf_fuse;
pub use rrf::rrf_fuse;

use std::collections::HashMap;

use thalamus_core::models::ScoredPoint;

/// Accumulates fused candidates in encounter order so that ties resolve
/// to whichever point was seen first across the input lists.
pub(crate) struct FusionAccumulator {
    points: Vec<ScoredPoint>,
    scores: Vec<f64>,
    slots: HashMap<String, usize>,
}

impl FusionAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            points: Vec::new(),
            scores: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Add `contribution` for `point`. The first sighting of an id keeps
    /// that point's payload; later sightings only add to its score.
    pub(crate) fn add(&mut self, point: &ScoredPoint, contribution: f64) {
        match self.slots.get(&point.id) {
            Some(&slot) => self.scores[slot] += contribution,
            None => {
                self.slots.insert(point.id.clone(), self.points.len());
                self.points.push(point.clone());
                self.scores.push(contribution);
            }
        }
    }

    /// Sort by fused score descending and truncate to `limit`.
    ///
    /// The sort is stable, so equal scores keep encounter order.
    pub(crate) fn finalize(self, limit: usize) -> Vec<ScoredPoint> {
        let mut fused: Vec<ScoredPoint> = self
            .points
            .into_iter()
            .zip(self.scores)
            .map(|(mut point, score)| {
                point.score = score as f32;
                point
            })
            .collect();

        fused.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        fused.truncate(limit);
        fused
    }
}
