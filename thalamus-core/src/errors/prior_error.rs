/// Prior subsystem errors. Benchmark problems are logged at load time
/// and degrade resolution instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum PriorError {
    #[error("benchmark load failed: {path}: {reason}")]
    BenchmarkLoadFailed { path: String, reason: String },

    #[error("malformed benchmark entry for {model}: {reason}")]
    MalformedEntry { model: String, reason: String },
}
