//! Ordered dense-encoder fallback.
//!
//! Each embed walks the providers in priority order. A provider failure
//! records a `DegradationEvent` and moves on; the hashed stand-in at the
//! end of the chain makes total failure an empty-chain-only condition.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thalamus_core::errors::{EmbeddingError, ThalamusError, ThalamusResult};
use thalamus_core::models::DegradationEvent;
use thalamus_core::traits::IDenseEncoder;
use tracing::warn;

pub struct EncoderChain {
    providers: Vec<Box<dyn IDenseEncoder>>,
    /// Index of the provider that served the most recent success.
    active: AtomicUsize,
    events: Mutex<Vec<DegradationEvent>>,
}

impl EncoderChain {
    /// `providers` must be non-empty; `active()` indexes into it.
    pub fn new(providers: Vec<Box<dyn IDenseEncoder>>) -> Self {
        Self {
            providers,
            active: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Embed with fallback. Returns the vector and the index of the
    /// provider that produced it.
    pub fn embed(&self, text: &str) -> ThalamusResult<(Vec<f32>, usize)> {
        let mut last_error = None;
        for (index, provider) in self.providers.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match provider.embed(text) {
                Ok(vector) => {
                    self.active.store(index, Ordering::Relaxed);
                    return Ok((vector, index));
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        "dense encoder failed, trying next in chain"
                    );
                    self.record_fallback(index, &err);
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: format!("all {} dense encoders", self.providers.len()),
            }
            .into()
        }))
    }

    /// Batch embed with the same fallback walk.
    pub fn embed_batch(&self, texts: &[String]) -> ThalamusResult<(Vec<Vec<f32>>, usize)> {
        let mut last_error = None;
        for (index, provider) in self.providers.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match provider.embed_batch(texts) {
                Ok(vectors) => {
                    self.active.store(index, Ordering::Relaxed);
                    return Ok((vectors, index));
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        "dense batch embed failed, trying next in chain"
                    );
                    self.record_fallback(index, &err);
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: format!("all {} dense encoders", self.providers.len()),
            }
            .into()
        }))
    }

    fn record_fallback(&self, failed_index: usize, err: &ThalamusError) {
        let failed = self
            .providers
            .get(failed_index)
            .map(|p| p.name())
            .unwrap_or("unknown");
        let fallback = self
            .providers
            .get(failed_index + 1)
            .map(|p| p.name())
            .unwrap_or("none");
        if let Ok(mut events) = self.events.lock() {
            events.push(DegradationEvent::now(
                format!("embeddings/{failed}"),
                err.to_string(),
                fallback,
            ));
        }
    }

    /// The provider that served the most recent success (the first one
    /// before any traffic).
    pub fn active(&self) -> &dyn IDenseEncoder {
        let index = self
            .active
            .load(Ordering::Relaxed)
            .min(self.providers.len().saturating_sub(1));
        self.providers[index].as_ref()
    }

    pub fn is_semantic(&self) -> bool {
        self.active().is_semantic()
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HashedDenseEncoder;

    struct FailingEncoder;

    impl IDenseEncoder for FailingEncoder {
        fn embed(&self, _text: &str) -> ThalamusResult<Vec<f32>> {
            Err(EmbeddingError::InferenceFailed {
                reason: "mock failure".to_string(),
            }
            .into())
        }
        fn embed_batch(&self, _texts: &[String]) -> ThalamusResult<Vec<Vec<f32>>> {
            Err(EmbeddingError::InferenceFailed {
                reason: "mock failure".to_string(),
            }
            .into())
        }
        fn dimensions(&self) -> usize {
            64
        }
        fn name(&self) -> &str {
            "failing-mock"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn is_semantic(&self) -> bool {
            true
        }
    }

    #[test]
    fn primary_success_records_no_events() {
        let chain = EncoderChain::new(vec![
            Box::new(HashedDenseEncoder::new(64)),
            Box::new(FailingEncoder),
        ]);
        let (vector, index) = chain.embed("hello chain").unwrap();
        assert_eq!(vector.len(), 64);
        assert_eq!(index, 0);
        assert!(chain.drain_events().is_empty());
    }

    #[test]
    fn failure_falls_through_and_records_event() {
        let chain = EncoderChain::new(vec![
            Box::new(FailingEncoder),
            Box::new(HashedDenseEncoder::new(64)),
        ]);
        let (_, index) = chain.embed("hello fallback").unwrap();
        assert_eq!(index, 1);
        assert!(!chain.is_semantic());

        let events = chain.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fallback_used, "hashed-dense");
        assert!(events[0].component.contains("failing-mock"));
        // Drained events are gone.
        assert!(chain.drain_events().is_empty());
    }

    #[test]
    fn all_providers_failing_returns_error() {
        let chain = EncoderChain::new(vec![Box::new(FailingEncoder), Box::new(FailingEncoder)]);
        assert!(chain.embed("doomed").is_err());
        assert_eq!(chain.drain_events().len(), 2);
    }

    #[test]
    fn batch_walks_the_same_chain() {
        let chain = EncoderChain::new(vec![
            Box::new(FailingEncoder),
            Box::new(HashedDenseEncoder::new(32)),
        ]);
        let texts = vec!["one".to_string(), "two".to_string()];
        let (vectors, index) = chain.embed_batch(&texts).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(index, 1);
    }

    #[test]
    fn active_tracks_the_serving_provider() {
        let chain = EncoderChain::new(vec![
            Box::new(FailingEncoder),
            Box::new(HashedDenseEncoder::new(16)),
        ]);
        // Optimistic before traffic: the primary claims semantics.
        assert!(chain.is_semantic());
        chain.embed("probe").unwrap();
        assert_eq!(chain.active().name(), "hashed-dense");
    }
}
