use thiserror::Error;

/// Errors returned by [`MetricsRegistry`](crate::MetricsRegistry) operations.
///
/// These signal programming mistakes (bad names or labels), never
/// conditions a client of the HTTP API can trigger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// A metric with this name is already registered.
    #[error("Metric already registered: {name}")]
    DuplicateMetric { name: String },

    /// No counter with this name was registered.
    #[error("Unknown metric: {name}")]
    UnknownMetric { name: String },

    /// The provided label keys do not match the declared schema.
    #[error("Label mismatch for metric {name}: expected {expected:?}, got {actual:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Result type for metrics registry operations.
pub type Result<T> = std::result::Result<T, MetricsError>;
