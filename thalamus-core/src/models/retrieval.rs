use serde::{Deserialize, Serialize};

/// A point returned by the external store. The payload belongs to the
/// store and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Value,
}

impl ScoredPoint {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// How the final ranking was produced. Doubles as the degradation
/// indicator: `DenseOnly` marks a fallback, `None` a fully failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    Rrf,
    Dbsf,
    DenseOnly,
    None,
}

impl FusionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionMethod::Rrf => "rrf",
            FusionMethod::Dbsf => "dbsf",
            FusionMethod::DenseOnly => "dense_only",
            FusionMethod::None => "none",
        }
    }
}

impl std::fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance and degradation notes attached to every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMetadata {
    pub collection: String,
    /// Candidates contributed by the sparse arm before fusion.
    pub sparse_candidates: usize,
    /// Candidates contributed by the dense arm before fusion.
    pub dense_candidates: usize,
    /// Present when the call degraded below dense-only.
    pub error: Option<String>,
}

/// The result envelope of a retrieval call. Always returned, never an
/// error: failures surface as `fusion_method` + `metadata.error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResponse {
    pub points: Vec<ScoredPoint>,
    /// Scores parallel to `points`.
    pub scores: Vec<f32>,
    pub reranked: bool,
    pub fusion_method: FusionMethod,
    pub latency_ms: f64,
    pub metadata: RetrievalMetadata,
}

impl RetrievalResponse {
    /// Build a response from ranked points; the parallel score list is
    /// derived from them.
    pub fn ranked(
        points: Vec<ScoredPoint>,
        fusion_method: FusionMethod,
        metadata: RetrievalMetadata,
    ) -> Self {
        let scores = points.iter().map(|p| p.score).collect();
        Self {
            points,
            scores,
            reranked: false,
            fusion_method,
            latency_ms: 0.0,
            metadata,
        }
    }

    pub fn empty(fusion_method: FusionMethod, metadata: RetrievalMetadata) -> Self {
        Self::ranked(Vec::new(), fusion_method, metadata)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(
            self.fusion_method,
            FusionMethod::DenseOnly | FusionMethod::None
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fusion_method_strings_are_stable() {
        assert_eq!(FusionMethod::Rrf.as_str(), "rrf");
        assert_eq!(FusionMethod::Dbsf.as_str(), "dbsf");
        assert_eq!(FusionMethod::DenseOnly.as_str(), "dense_only");
        assert_eq!(FusionMethod::None.as_str(), "none");
    }

    #[test]
    fn fusion_method_serializes_snake_case() {
        let json = serde_json::to_string(&FusionMethod::DenseOnly).unwrap();
        assert_eq!(json, "\"dense_only\"");
        let back: FusionMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FusionMethod::DenseOnly);
    }

    #[test]
    fn ranked_derives_parallel_scores() {
        let points = vec![ScoredPoint::new("a", 0.9), ScoredPoint::new("b", 0.4)];
        let response =
            RetrievalResponse::ranked(points, FusionMethod::Rrf, RetrievalMetadata::default());
        assert_eq!(response.scores, vec![0.9, 0.4]);
        assert!(!response.is_degraded());
    }
}
