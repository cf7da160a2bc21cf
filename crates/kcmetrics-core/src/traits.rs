use std::sync::Arc;

use crate::error::MetricsResult;
use crate::meter::MeterId;

/// A monotonically increasing counter handle.
pub trait Counter: Send + Sync {
    /// Adds one to the counter.
    fn increment(&self);

    /// Returns the current value.
    fn count(&self) -> u64;
}

/// Registry that owns counter series and hands out handles to them.
///
/// Implementations must be safe to call from many units of work at once.
pub trait MeterRegistry: Send + Sync {
    /// Returns the counter for `id`, creating the series on first use.
    ///
    /// Repeated calls with the same name and tags return the same logical
    /// series.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot hold the series, e.g. the
    /// name is already registered with a different set of tag keys.
    fn counter(&self, id: &MeterId) -> MetricsResult<Arc<dyn Counter>>;
}

impl<R: MeterRegistry + ?Sized> MeterRegistry for Arc<R> {
    fn counter(&self, id: &MeterId) -> MetricsResult<Arc<dyn Counter>> {
        (**self).counter(id)
    }
}
