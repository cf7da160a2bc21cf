use thiserror::Error;

/// Canonical error type for event metrics configuration and registries.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration was loaded but holds values that cannot be used.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable explanation of the rejected value.
        message: String,
    },

    /// A string did not name any known user event type.
    #[error("unknown event type `{0}`")]
    UnknownEventType(String),

    /// A string did not name any known admin operation type.
    #[error("unknown operation type `{0}`")]
    UnknownOperationType(String),

    /// A string did not name any known admin resource type.
    #[error("unknown resource type `{0}`")]
    UnknownResourceType(String),

    /// A string did not name any tag the user event counter supports.
    #[error("unknown user event tag `{0}`")]
    UnknownUserEventTag(String),

    /// The registry already holds this meter name with a different tag shape.
    #[error("meter `{name}` is registered with tag keys {expected:?}, got {found:?}")]
    IncompatibleSeries {
        /// Meter name as requested by the caller.
        name: String,
        /// Tag keys of the existing series.
        expected: Vec<String>,
        /// Tag keys of the rejected request.
        found: Vec<String>,
    },

    /// The Prometheus client rejected a registration or lookup.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

impl MetricsError {
    /// Creates an `InvalidConfig` variant.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an `IncompatibleSeries` variant.
    #[must_use]
    pub fn incompatible_series(
        name: impl Into<String>,
        expected: Vec<String>,
        found: Vec<String>,
    ) -> Self {
        Self::IncompatibleSeries {
            name: name.into(),
            expected,
            found,
        }
    }
}

/// Convenient result alias for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
