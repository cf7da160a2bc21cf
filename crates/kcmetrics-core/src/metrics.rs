//! Self-observability for the event metrics pipeline
//!
//! These counters describe the pipeline itself, not the events it counts.
//! They live in the Prometheus default registry and are registered lazily
//! on first access using once_cell::Lazy.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

/// Label value for user events.
pub const KIND_USER: &str = "user";
/// Label value for admin events.
pub const KIND_ADMIN: &str = "admin";

/// Buffered events handed to an aggregator after a successful unit of work
pub static EVENTS_FLUSHED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kcmetrics_events_flushed_total",
        "Buffered events counted after their unit of work committed",
        &["listener", "kind"]
    )
    .expect("Failed to register flushed events counter")
});

/// Buffered events dropped because their unit of work did not commit
pub static EVENTS_DISCARDED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kcmetrics_events_discarded_total",
        "Buffered events dropped on rollback",
        &["listener", "kind"]
    )
    .expect("Failed to register discarded events counter")
});

/// Events skipped by an event filter or allow-list
pub static EVENTS_FILTERED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kcmetrics_events_filtered_total",
        "Events skipped by configuration",
        &["listener", "kind"]
    )
    .expect("Failed to register filtered events counter")
});

/// Counter lookups the registry refused
pub static REGISTRY_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "kcmetrics_registry_errors_total",
        "Counter increments skipped because the registry rejected the series"
    )
    .expect("Failed to register registry errors counter")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let _ = &*EVENTS_FLUSHED;
        let _ = &*EVENTS_DISCARDED;
        let _ = &*EVENTS_FILTERED;
        let _ = &*REGISTRY_ERRORS;
    }

    #[test]
    fn test_flushed_metrics_increment() {
        EVENTS_FLUSHED
            .with_label_values(&["metrics-test", KIND_USER])
            .inc();

        let metrics = prometheus::gather();
        let flushed: Vec<_> = metrics
            .iter()
            .filter(|m| m.get_name() == "kcmetrics_events_flushed_total")
            .collect();

        assert!(!flushed.is_empty());
    }
}
