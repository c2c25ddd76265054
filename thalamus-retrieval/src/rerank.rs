//! Client for a remote rescoring service.
//!
//! Wire shape: `POST {endpoint}/rescore` with `{"query": ...,
//! "candidates": [...]}`, answered by `{"scores": [...]}` carrying one
//! relevance score per candidate, in candidate order.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thalamus_core::errors::{RetrievalError, ThalamusResult};
use thalamus_core::traits::IReranker;

#[derive(Serialize)]
struct RescoreRequest<'a> {
    query: &'a str,
    candidates: &'a [String],
}

#[derive(Deserialize)]
struct RescoreResponse {
    scores: Vec<f32>,
}

/// Cross-encoder style reranker backed by a remote scoring service.
pub struct RemoteReranker {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteReranker {
    pub fn new(endpoint: &str, timeout: Duration) -> ThalamusResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RetrievalError::RerankFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IReranker for RemoteReranker {
    async fn rescore(&self, query: &str, candidates: &[String]) -> ThalamusResult<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/rescore", self.endpoint))
            .json(&RescoreRequest { query, candidates })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RetrievalError::RerankFailed {
                reason: e.to_string(),
            })?;
        let body: RescoreResponse =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::RerankFailed {
                    reason: format!("malformed response: {e}"),
                })?;
        if body.scores.len() != candidates.len() {
            return Err(RetrievalError::RerankFailed {
                reason: format!(
                    "requested {} scores, got {}",
                    candidates.len(),
                    body.scores.len()
                ),
            }
            .into());
        }
        Ok(body.scores)
    }

    fn name(&self) -> &str {
        "remote-reranker"
    }
}
