/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {reason}")]
    ParseFailed { reason: String },

    #[error("config read failed: {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}
