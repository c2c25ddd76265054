//! Clients for a remote embedding service.
//!
//! Wire shape: `POST {endpoint}/embed` with `{"texts": [...], "mode":
//! "dense" | "sparse"}`. Dense responses carry one vector per text;
//! sparse responses carry parallel index/value arrays.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thalamus_core::errors::{EmbeddingError, ThalamusResult};
use thalamus_core::models::SparseVector;
use thalamus_core::traits::{IDenseEncoder, ISparseEncoder};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    mode: &'static str,
}

#[derive(Deserialize)]
struct DenseEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct SparseEmbedResponse {
    embeddings: Vec<SparsePair>,
}

#[derive(Deserialize)]
struct SparsePair {
    indices: Vec<u32>,
    values: Vec<f32>,
}

fn build_client(timeout: Duration) -> ThalamusResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            EmbeddingError::RemoteRequestFailed {
                reason: e.to_string(),
            }
            .into()
        })
}

fn validate_dense(
    embeddings: Vec<Vec<f32>>,
    requested: usize,
    dimensions: usize,
) -> ThalamusResult<Vec<Vec<f32>>> {
    if embeddings.len() != requested {
        return Err(EmbeddingError::InferenceFailed {
            reason: format!("requested {requested} embeddings, got {}", embeddings.len()),
        }
        .into());
    }
    for vector in &embeddings {
        if vector.len() != dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimensions,
                actual: vector.len(),
            }
            .into());
        }
    }
    Ok(embeddings)
}

fn sparse_from_pair(pair: SparsePair) -> ThalamusResult<SparseVector> {
    if pair.indices.len() != pair.values.len() {
        return Err(EmbeddingError::InferenceFailed {
            reason: format!(
                "sparse index/value length mismatch: {} vs {}",
                pair.indices.len(),
                pair.values.len()
            ),
        }
        .into());
    }
    Ok(SparseVector::from_pairs(
        pair.indices.into_iter().zip(pair.values),
    ))
}

fn post_embed<R: serde::de::DeserializeOwned>(
    client: &reqwest::blocking::Client,
    endpoint: &str,
    texts: &[String],
    mode: &'static str,
) -> ThalamusResult<R> {
    let response = client
        .post(format!("{endpoint}/embed"))
        .json(&EmbedRequest { texts, mode })
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| EmbeddingError::RemoteRequestFailed {
            reason: e.to_string(),
        })?;
    response.json().map_err(|e| {
        EmbeddingError::RemoteRequestFailed {
            reason: format!("malformed response: {e}"),
        }
        .into()
    })
}

/// Dense encoder backed by the remote service.
pub struct RemoteDenseEncoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    dimensions: usize,
}

impl RemoteDenseEncoder {
    pub fn new(endpoint: &str, dimensions: usize, timeout: Duration) -> ThalamusResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            dimensions,
        })
    }
}

impl IDenseEncoder for RemoteDenseEncoder {
    fn embed(&self, text: &str) -> ThalamusResult<Vec<f32>> {
        let mut vectors = self.embed_batch(std::slice::from_ref(&text.to_string()))?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::RemoteRequestFailed {
                reason: "empty embedding response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> ThalamusResult<Vec<Vec<f32>>> {
        let body: DenseEmbedResponse = post_embed(&self.client, &self.endpoint, texts, "dense")?;
        validate_dense(body.embeddings, texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "remote-dense"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_semantic(&self) -> bool {
        true
    }
}

/// Sparse encoder backed by the remote service.
pub struct RemoteSparseEncoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    vocab_size: u32,
}

impl RemoteSparseEncoder {
    pub fn new(endpoint: &str, vocab_size: u32, timeout: Duration) -> ThalamusResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            vocab_size,
        })
    }
}

impl ISparseEncoder for RemoteSparseEncoder {
    fn embed_sparse(&self, text: &str) -> ThalamusResult<SparseVector> {
        let texts = [text.to_string()];
        let mut body: SparseEmbedResponse = post_embed(&self.client, &self.endpoint, &texts, "sparse")?;
        let pair = body.embeddings.pop().ok_or_else(|| EmbeddingError::RemoteRequestFailed {
            reason: "empty embedding response".to_string(),
        })?;
        sparse_from_pair(pair)
    }

    fn vocab_size(&self) -> u32 {
        self.vocab_size
    }

    fn name(&self) -> &str {
        "remote-sparse"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_response_deserializes_and_validates() {
        let body: DenseEmbedResponse =
            serde_json::from_str(r#"{"embeddings": [[0.1, 0.2], [0.3, 0.4]]}"#).unwrap();
        let vectors = validate_dense(body.embeddings, 2, 2).unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn short_dense_response_maps_to_inference_error() {
        let body: DenseEmbedResponse =
            serde_json::from_str(r#"{"embeddings": [[0.1, 0.2]]}"#).unwrap();
        let err = validate_dense(body.embeddings, 2, 2).unwrap_err();
        assert!(err.to_string().contains("requested 2 embeddings, got 1"));
    }

    #[test]
    fn wrong_width_dense_response_maps_to_dimension_mismatch() {
        let err = validate_dense(vec![vec![0.1, 0.2, 0.3]], 1, 2).unwrap_err();
        assert!(err
            .to_string()
            .contains("dimension mismatch: expected 2, got 3"));
    }

    #[test]
    fn sparse_pair_converts_to_sorted_vector() {
        let mut body: SparseEmbedResponse = serde_json::from_str(
            r#"{"embeddings": [{"indices": [9, 2, 9], "values": [1.0, 0.5, 2.0]}]}"#,
        )
        .unwrap();
        let sv = sparse_from_pair(body.embeddings.pop().unwrap()).unwrap();
        assert_eq!(sv.indices, vec![2, 9]);
        assert_eq!(sv.values, vec![0.5, 3.0]);
    }

    #[test]
    fn uneven_sparse_pair_is_rejected() {
        let pair = SparsePair {
            indices: vec![1, 2],
            values: vec![1.0],
        };
        let err = sparse_from_pair(pair).unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }
}
