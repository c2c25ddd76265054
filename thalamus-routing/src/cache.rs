//! Semantic routing cache.
//!
//! Caches routing decisions keyed by query embedding: a lookup whose
//! cosine similarity to a stored query reaches the threshold reuses
//! that query's decision. Contexts partition the cache through their
//! digest; entries never match across partitions. Eviction is strict
//! LRU by access tick, expiry is lazy, and no operation raises to the
//! caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use thalamus_core::config::{defaults, RoutingCacheConfig};
use thalamus_core::errors::{RoutingError, ThalamusResult};
use thalamus_core::models::{CachedRoute, RequestContext, RouteCacheStats, RoutingDecision};
use thalamus_embeddings::EmbeddingMatcher;
use tracing::{debug, info, warn};

use crate::digest::context_digest;

struct CacheEntry {
    query: String,
    embedding: Vec<f32>,
    digest: String,
    model: String,
    decision: RoutingDecision,
    created_at: DateTime<Utc>,
    ttl: Duration,
    access_count: u64,
    last_accessed: DateTime<Utc>,
    /// Monotonic recency counter; the smallest tick is evicted first.
    tick: u64,
}

impl CacheEntry {
    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) >= self.ttl
    }
}

struct CacheInner {
    entries: HashMap<u64, CacheEntry>,
    /// Entry ids grouped by context digest; lookups scan one bucket.
    by_digest: HashMap<String, Vec<u64>>,
    next_id: u64,
    next_tick: u64,
    threshold: f64,
}

/// Embedding-similarity cache for routing decisions. One mutex guards
/// the entry map; statistics live in atomics beside it and are read on
/// a relaxed path.
pub struct SemanticRouteCache {
    matcher: Arc<EmbeddingMatcher>,
    inner: Mutex<CacheInner>,
    capacity: usize,
    default_ttl_secs: u64,
    shadow: AtomicBool,
    hits: AtomicU64,
    misses: AtomicU64,
    shadow_hits: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
    insertions: AtomicU64,
    /// Σ similarity-on-hit, scaled by 1e6 to live in an atomic.
    similarity_micros: AtomicU64,
    /// Σ estimated latency saved, microseconds.
    latency_saved_micros: AtomicU64,
    /// Mirror of `inner.entries.len()`, updated after each mutation.
    entry_count: AtomicUsize,
    semantic_warned: AtomicBool,
}

impl SemanticRouteCache {
    pub fn new(
        matcher: Arc<EmbeddingMatcher>,
        config: &RoutingCacheConfig,
    ) -> ThalamusResult<Self> {
        if config.capacity == 0 {
            return Err(RoutingError::InvalidConfig {
                reason: "capacity must be non-zero".to_string(),
            }
            .into());
        }
        let configured = config.similarity_threshold;
        let threshold = if configured.is_finite() {
            configured.clamp(0.0, 1.0)
        } else {
            defaults::DEFAULT_SIMILARITY_THRESHOLD
        };
        if threshold != configured {
            warn!(configured, using = threshold, "similarity threshold out of range");
        }
        Ok(Self {
            matcher,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                by_digest: HashMap::new(),
                next_id: 0,
                next_tick: 0,
                threshold,
            }),
            capacity: config.capacity,
            default_ttl_secs: config.default_ttl_secs,
            shadow: AtomicBool::new(config.shadow_mode),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            shadow_hits: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
            similarity_micros: AtomicU64::new(0),
            latency_saved_micros: AtomicU64::new(0),
            entry_count: AtomicUsize::new(0),
            semantic_warned: AtomicBool::new(false),
        })
    }

    /// Look up a cached decision for `query` under `context`.
    ///
    /// `estimated_latency_saved_ms` is what a hit is worth; it only
    /// feeds the statistics. Returns `None` on any miss, including
    /// every failure path.
    pub fn get(
        &self,
        query: &str,
        context: &RequestContext,
        estimated_latency_saved_ms: f64,
    ) -> Option<CachedRoute> {
        if query.trim().is_empty() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        // A hash-derived embedding has no semantics: similarity over it
        // would serve arbitrary decisions. Force misses instead.
        if !self.matcher.is_semantic() {
            if !self.semantic_warned.swap(true, Ordering::Relaxed) {
                warn!(
                    encoder = self.matcher.active_encoder(),
                    "dense encoder is non-semantic, routing cache serves no hits"
                );
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        let embedding = match self.matcher.embed(query) {
            Ok(vector) => vector,
            Err(e) => {
                debug!(error = %e, "query embedding failed, treating lookup as miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let digest = context_digest(context);
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let mut expired: Vec<u64> = Vec::new();
        let mut best: Option<(u64, f64)> = None;
        if let Some(bucket) = inner.by_digest.get(&digest) {
            for &id in bucket {
                let Some(entry) = inner.entries.get(&id) else {
                    continue;
                };
                if entry.expired_at(now) {
                    expired.push(id);
                    continue;
                }
                let similarity = self.matcher.similarity(&embedding, &entry.embedding);
                // Strictly greater keeps the first-scanned entry on ties.
                if best.map_or(true, |(_, s)| similarity > s) {
                    best = Some((id, similarity));
                }
            }
        }
        for &id in &expired {
            Self::remove_entry(&mut inner, id);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.entry_count.store(inner.entries.len(), Ordering::Relaxed);

        let threshold = inner.threshold;
        let Some((id, similarity)) = best.filter(|&(_, s)| s >= threshold) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        if self.shadow.load(Ordering::Relaxed) {
            if let Some(entry) = inner.entries.get(&id) {
                info!(
                    similarity,
                    model = %entry.model,
                    matched_query = %entry.query,
                    "shadow mode: withholding cache hit"
                );
            }
            self.shadow_hits.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let tick = inner.next_tick;
        inner.next_tick += 1;
        let entry = inner.entries.get_mut(&id)?;
        entry.tick = tick;
        entry.access_count += 1;
        entry.last_accessed = now;

        self.hits.fetch_add(1, Ordering::Relaxed);
        self.similarity_micros
            .fetch_add((similarity * 1e6) as u64, Ordering::Relaxed);
        if estimated_latency_saved_ms.is_finite() && estimated_latency_saved_ms > 0.0 {
            self.latency_saved_micros
                .fetch_add((estimated_latency_saved_ms * 1e3) as u64, Ordering::Relaxed);
        }

        debug!(similarity, model = %entry.model, "routing cache hit");
        Some(CachedRoute {
            model: entry.model.clone(),
            decision: entry.decision.clone(),
            similarity,
            matched_query: entry.query.clone(),
            age_secs: now.signed_duration_since(entry.created_at).num_seconds(),
        })
    }

    /// Store a routing decision. Returns whether the entry was
    /// inserted; shadow mode and every failure path drop it silently.
    pub fn set(
        &self,
        query: &str,
        context: &RequestContext,
        model: &str,
        decision: RoutingDecision,
        ttl_secs: Option<u64>,
    ) -> bool {
        if self.shadow.load(Ordering::Relaxed) {
            debug!("shadow mode: dropping cache insert");
            return false;
        }
        if query.trim().is_empty() {
            return false;
        }
        if !self.matcher.is_semantic() {
            if !self.semantic_warned.swap(true, Ordering::Relaxed) {
                warn!(
                    encoder = self.matcher.active_encoder(),
                    "dense encoder is non-semantic, routing cache serves no hits"
                );
            }
            return false;
        }
        let embedding = match self.matcher.embed(query) {
            Ok(vector) => vector,
            Err(e) => {
                debug!(error = %e, "query embedding failed, dropping cache insert");
                return false;
            }
        };

        let digest = context_digest(context);
        let now = Utc::now();
        let secs = ttl_secs.unwrap_or(self.default_ttl_secs);
        let ttl = Duration::try_seconds(secs.min(i64::MAX as u64) as i64).unwrap_or(Duration::MAX);

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.len() >= self.capacity {
            self.evict_for_space(&mut inner, now);
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let tick = inner.next_tick;
        inner.next_tick += 1;
        inner.by_digest.entry(digest.clone()).or_default().push(id);
        inner.entries.insert(
            id,
            CacheEntry {
                query: query.to_string(),
                embedding,
                digest,
                model: model.to_string(),
                decision,
                created_at: now,
                ttl,
                access_count: 0,
                last_accessed: now,
                tick,
            },
        );
        self.insertions.fetch_add(1, Ordering::Relaxed);
        self.entry_count.store(inner.entries.len(), Ordering::Relaxed);
        debug!(model, "cached routing decision");
        true
    }

    /// Statistics snapshot; never mutates the cache.
    pub fn stats(&self) -> RouteCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };
        let total_latency_saved_ms =
            self.latency_saved_micros.load(Ordering::Relaxed) as f64 / 1e3;
        RouteCacheStats {
            hits,
            misses,
            shadow_hits: self.shadow_hits.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            entry_count: self.entry_count.load(Ordering::Relaxed),
            hit_rate,
            miss_rate: if lookups == 0 { 0.0 } else { 1.0 - hit_rate },
            avg_similarity_on_hit: if hits == 0 {
                0.0
            } else {
                self.similarity_micros.load(Ordering::Relaxed) as f64 / 1e6 / hits as f64
            },
            avg_latency_saved_ms: if hits == 0 {
                0.0
            } else {
                total_latency_saved_ms / hits as f64
            },
            total_latency_saved_ms,
            shadow_mode: self.shadow.load(Ordering::Relaxed),
        }
    }

    /// Update the similarity threshold for future lookups. Values are
    /// clamped to [0, 1]; non-finite input is ignored.
    pub fn set_similarity_threshold(&self, threshold: f64) {
        if !threshold.is_finite() {
            warn!(threshold, "ignoring non-finite similarity threshold");
            return;
        }
        let clamped = threshold.clamp(0.0, 1.0);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        info!(from = inner.threshold, to = clamped, "similarity threshold updated");
        inner.threshold = clamped;
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .threshold
    }

    /// Flip shadow mode at runtime.
    pub fn set_shadow_mode(&self, enabled: bool) {
        let was = self.shadow.swap(enabled, Ordering::Relaxed);
        if was != enabled {
            info!(enabled, "routing cache shadow mode changed");
        }
    }

    pub fn shadow_mode(&self) -> bool {
        self.shadow.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.clear();
        inner.by_digest.clear();
        self.entry_count.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entry_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries, then evict by LRU until one slot is free.
    fn evict_for_space(&self, inner: &mut CacheInner, now: DateTime<Utc>) {
        let expired: Vec<u64> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.expired_at(now))
            .map(|(&id, _)| id)
            .collect();
        for id in expired {
            Self::remove_entry(inner, id);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.tick)
                .map(|(&id, _)| id)
            else {
                break;
            };
            Self::remove_entry(inner, oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(id = oldest, "evicted least-recently-used route");
        }
    }

    fn remove_entry(inner: &mut CacheInner, id: u64) {
        if let Some(entry) = inner.entries.remove(&id) {
            if let Some(bucket) = inner.by_digest.get_mut(&entry.digest) {
                bucket.retain(|&other| other != id);
                if bucket.is_empty() {
                    inner.by_digest.remove(&entry.digest);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ttl_expires_immediately() {
        let now = Utc::now();
        let entry = CacheEntry {
            query: "q".to_string(),
            embedding: vec![1.0],
            digest: "d".to_string(),
            model: "m".to_string(),
            decision: RoutingDecision::default(),
            created_at: now,
            ttl: Duration::zero(),
            access_count: 0,
            last_accessed: now,
            tick: 0,
        };
        assert!(entry.expired_at(now));
    }

    #[test]
    fn entry_survives_until_its_ttl() {
        let now = Utc::now();
        let entry = CacheEntry {
            query: "q".to_string(),
            embedding: vec![1.0],
            digest: "d".to_string(),
            model: "m".to_string(),
            decision: RoutingDecision::default(),
            created_at: now,
            ttl: Duration::seconds(60),
            access_count: 0,
            last_accessed: now,
            tick: 0,
        };
        assert!(!entry.expired_at(now + Duration::seconds(59)));
        assert!(entry.expired_at(now + Duration::seconds(60)));
    }
}
