//! Deterministic hashed encoders.
//!
//! Stand-ins used when no learned encoder is configured or reachable.
//! Output is a pure function of the text, so it is stable across
//! processes, but it carries no semantics: the dense variant reports
//! `is_semantic() == false` and consumers treat similarity over it as
//! unavailable.

use std::collections::HashMap;

use thalamus_core::errors::ThalamusResult;
use thalamus_core::models::SparseVector;
use thalamus_core::traits::{IDenseEncoder, ISparseEncoder};

/// FNV-1a, the same term hash for both encoders.
fn hash_term(term: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for byte in term.as_bytes() {
        h ^= u64::from(*byte);
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

/// Lowercase alphanumeric terms of length >= 2, with sublinear
/// frequency weights.
fn term_weights(text: &str) -> HashMap<String, f32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for term in text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.len() >= 2)
    {
        *counts.entry(term.to_lowercase()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(term, count)| (term, 1.0 + (count as f32).ln()))
        .collect()
}

/// Signed feature hashing into a fixed-dimension dense vector.
///
/// Each term lands in `hash % dimensions` with a sign from the hash's
/// top bit, keeping the expected dot product of unrelated texts near
/// zero. Output is L2-normalized; text with no usable terms maps to
/// the zero vector.
pub struct HashedDenseEncoder {
    dimensions: usize,
}

impl HashedDenseEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dimensions];
        for (term, weight) in term_weights(text) {
            let h = hash_term(&term);
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
            out[bucket] += sign * weight;
        }
        let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut out {
                *v /= norm;
            }
        }
        out
    }
}

impl IDenseEncoder for HashedDenseEncoder {
    fn embed(&self, text: &str) -> ThalamusResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> ThalamusResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-dense"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_semantic(&self) -> bool {
        false
    }
}

/// Hashed bag-of-terms sparse encoder: each term takes one vocabulary
/// bucket, weighted by sublinear frequency, L2-normalized.
pub struct HashedSparseEncoder {
    vocab_size: u32,
}

impl HashedSparseEncoder {
    pub fn new(vocab_size: u32) -> Self {
        Self { vocab_size }
    }
}

impl ISparseEncoder for HashedSparseEncoder {
    fn embed_sparse(&self, text: &str) -> ThalamusResult<SparseVector> {
        let pairs = term_weights(text)
            .into_iter()
            .map(|(term, weight)| ((hash_term(&term) % u64::from(self.vocab_size)) as u32, weight));
        let mut sv = SparseVector::from_pairs(pairs);
        sv.normalize();
        Ok(sv)
    }

    fn vocab_size(&self) -> u32 {
        self.vocab_size
    }

    fn name(&self) -> &str {
        "hashed-sparse"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine;

    #[test]
    fn dense_is_deterministic() {
        let encoder = HashedDenseEncoder::new(256);
        let a = encoder.embed("routing cache lookup").unwrap();
        let b = encoder.embed("routing cache lookup").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn dense_has_requested_dimensions() {
        let encoder = HashedDenseEncoder::new(384);
        let v = encoder.embed("dimensional check").unwrap();
        assert_eq!(v.len(), 384);
    }

    #[test]
    fn dense_output_is_unit_norm() {
        let encoder = HashedDenseEncoder::new(128);
        let v = encoder.embed("normalize this vector please").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn dense_empty_text_maps_to_zero_vector() {
        let encoder = HashedDenseEncoder::new(64);
        let v = encoder.embed("").unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn dense_batch_matches_individual() {
        let encoder = HashedDenseEncoder::new(128);
        let texts = vec!["first query".to_string(), "second query".to_string()];
        let batch = encoder.embed_batch(&texts).unwrap();
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(batch[i], encoder.embed(text).unwrap());
        }
    }

    #[test]
    fn dense_is_marked_non_semantic() {
        let encoder = HashedDenseEncoder::new(64);
        assert!(!encoder.is_semantic());
        assert!(encoder.is_available());
    }

    #[test]
    fn overlapping_texts_score_higher_than_disjoint() {
        let encoder = HashedDenseEncoder::new(512);
        let a = encoder.embed("tokio async runtime scheduler").unwrap();
        let b = encoder.embed("tokio async runtime executor").unwrap();
        let c = encoder.embed("sourdough bread hydration").unwrap();
        assert!(cosine(&a, &b) > cosine(&a, &c));
    }

    #[test]
    fn sparse_indices_stay_in_vocab() {
        let encoder = HashedSparseEncoder::new(1_000);
        let sv = encoder
            .embed_sparse("many different words to spread across buckets")
            .unwrap();
        assert!(!sv.is_empty());
        assert!(sv.indices.iter().all(|&i| i < 1_000));
    }

    #[test]
    fn sparse_is_deterministic_and_normalized() {
        let encoder = HashedSparseEncoder::new(30_522);
        let a = encoder.embed_sparse("stable sparse output").unwrap();
        let b = encoder.embed_sparse("stable sparse output").unwrap();
        assert_eq!(a, b);
        let norm: f32 = a.values.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sparse_repeated_terms_weigh_more() {
        let encoder = HashedSparseEncoder::new(30_522);
        let once = encoder.embed_sparse("alpha beta").unwrap();
        let twice = encoder.embed_sparse("alpha alpha alpha beta").unwrap();
        // Same buckets, heavier relative weight on the repeated term.
        assert_eq!(once.indices, twice.indices);
        assert!(once.dot(&twice) > 0.9);
    }
}
