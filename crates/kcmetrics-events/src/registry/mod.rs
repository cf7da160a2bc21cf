//! `MeterRegistry` backends.

mod prometheus_registry;
mod simple;

pub use self::prometheus_registry::{prometheus_label, prometheus_name, PrometheusMeterRegistry};
pub use self::simple::{CounterSnapshot, SimpleMeterRegistry};

use kcmetrics_core::metrics::REGISTRY_ERRORS;
use kcmetrics_core::{MeterId, MeterRegistry};
use tracing::warn;

/// Increment the series for `id`, absorbing registry failures.
pub(crate) fn increment(registry: &dyn MeterRegistry, id: &MeterId) {
    match registry.counter(id) {
        Ok(counter) => counter.increment(),
        Err(err) => {
            REGISTRY_ERRORS.inc();
            warn!(meter = %id.name, error = %err, "skipping counter increment");
        }
    }
}
