//! Static benchmark table.
//!
//! A JSON document keyed by model id, read once at startup and
//! read-only afterwards. Load problems are logged and yield an empty
//! table so resolution falls through to family inheritance or the
//! uniform prior instead of failing the caller.

use std::collections::HashMap;

use thalamus_core::errors::{PriorError, ThalamusResult};
use thalamus_core::models::BenchmarkEntry;
use tracing::warn;

pub struct BenchmarkTable {
    entries: HashMap<String, BenchmarkEntry>,
}

impl BenchmarkTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build from parsed entries. Malformed rows and malformed context
    /// sub-entries are dropped with a warning, never fatal.
    pub fn from_entries(entries: HashMap<String, BenchmarkEntry>) -> Self {
        let mut kept: HashMap<String, BenchmarkEntry> = HashMap::new();
        for (model, mut entry) in entries {
            if let Err(err) =
                validate_moments(&model, entry.mean_reward, entry.variance, entry.sample_count)
            {
                warn!(error = %err, "dropping malformed benchmark entry");
                continue;
            }
            entry.contexts.retain(|context, sub| {
                match validate_moments(
                    &format!("{model}/{context}"),
                    sub.mean_reward,
                    sub.variance,
                    sub.sample_count,
                ) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "dropping malformed context benchmark");
                        false
                    }
                }
            });
            kept.insert(model, entry);
        }
        Self { entries: kept }
    }

    /// Read and parse a benchmark file, strictly. The lenient path for
    /// service startup is [`BenchmarkTable::load`].
    pub fn try_load(path: &str) -> ThalamusResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PriorError::BenchmarkLoadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let entries: HashMap<String, BenchmarkEntry> =
            serde_json::from_str(&raw).map_err(|e| PriorError::BenchmarkLoadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }

    /// Load a benchmark file, degrading to an empty table on failure.
    pub fn load(path: &str) -> Self {
        match Self::try_load(path) {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, "benchmark table unavailable, resolving without it");
                Self::empty()
            }
        }
    }

    pub fn get(&self, model: &str) -> Option<&BenchmarkEntry> {
        self.entries.get(model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_moments(label: &str, mean: f64, variance: f64, samples: u64) -> Result<(), PriorError> {
    let reason = if !mean.is_finite() || !(0.0..=1.0).contains(&mean) {
        "mean_reward outside [0, 1]"
    } else if !variance.is_finite() || variance < 0.0 {
        "negative or non-finite variance"
    } else if samples == 0 {
        "zero sample_count"
    } else {
        return Ok(());
    };
    Err(PriorError::MalformedEntry {
        model: label.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mean: f64, variance: f64, samples: u64) -> BenchmarkEntry {
        BenchmarkEntry {
            mean_reward: mean,
            variance,
            sample_count: samples,
            contexts: HashMap::new(),
        }
    }

    #[test]
    fn valid_rows_are_kept() {
        let table = BenchmarkTable::from_entries(HashMap::from([
            ("base".to_string(), entry(0.8, 0.02, 500)),
            ("small".to_string(), entry(0.6, 0.05, 200)),
        ]));
        assert_eq!(table.len(), 2);
        assert!(table.get("base").is_some());
    }

    #[test]
    fn malformed_rows_are_dropped() {
        let table = BenchmarkTable::from_entries(HashMap::from([
            ("negative-mean".to_string(), entry(-0.1, 0.02, 500)),
            ("nan-variance".to_string(), entry(0.8, f64::NAN, 500)),
            ("no-samples".to_string(), entry(0.8, 0.02, 0)),
            ("fine".to_string(), entry(0.8, 0.02, 500)),
        ]));
        assert_eq!(table.len(), 1);
        assert!(table.get("fine").is_some());
    }

    #[test]
    fn malformed_sub_entry_spares_the_row() {
        let mut base = entry(0.8, 0.02, 500);
        base.contexts.insert(
            "code".to_string(),
            thalamus_core::models::ContextBenchmark {
                mean_reward: 2.0,
                variance: 0.02,
                sample_count: 100,
            },
        );
        base.contexts.insert(
            "chat".to_string(),
            thalamus_core::models::ContextBenchmark {
                mean_reward: 0.7,
                variance: 0.04,
                sample_count: 80,
            },
        );
        let table = BenchmarkTable::from_entries(HashMap::from([("base".to_string(), base)]));
        let kept = table.get("base").unwrap();
        assert!(kept.contexts.contains_key("chat"));
        assert!(!kept.contexts.contains_key("code"));
    }
}
