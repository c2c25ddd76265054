/// Fire-and-forget metrics sink. Implementations must not block the
/// caller and must swallow their own failures.
pub trait IMetricsSink: Send + Sync {
    fn incr_counter(&self, name: &str, labels: &[(&str, &str)], value: u64);

    fn observe_histogram(&self, name: &str, labels: &[(&str, &str)], value: f64);
}

/// Sink that drops everything. The default when no sink is injected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMetricsSink;

impl IMetricsSink for NullMetricsSink {
    fn incr_counter(&self, _name: &str, _labels: &[(&str, &str)], _value: u64) {}

    fn observe_histogram(&self, _name: &str, _labels: &[(&str, &str)], _value: f64) {}
}
