/// Routing-cache errors. Lookups and inserts never raise; only
/// construction can fail.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("invalid routing cache config: {reason}")]
    InvalidConfig { reason: String },
}
