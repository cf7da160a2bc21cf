//! Transactional conversion of user and admin events into counters.
//!
//! Events are buffered per unit of work and only turn into counter
//! increments after that unit of work commits. Two strategies are provided:
//! per-type counters ([`EventMetricsAggregator`]) and one shared counter
//! split by tags ([`UserEventMetricsAggregator`]).

pub mod buffer;
pub mod classifier;
pub mod event_metrics;
pub mod factory;
pub mod listener;
pub mod registry;
pub mod unit_of_work;
pub mod user_event_metrics;

pub use buffer::{Aggregator, EventBuffer};
pub use classifier::CountingBehavior;
pub use event_metrics::EventMetricsAggregator;
pub use factory::{
    EventListenerFactory, EventMetricsListenerFactory, MetricsPipeline,
    UserEventMetricsListenerFactory,
};
pub use listener::BufferedEventListener;
pub use registry::{PrometheusMeterRegistry, SimpleMeterRegistry};
pub use unit_of_work::{EventListener, UnitOfWork};
pub use user_event_metrics::UserEventMetricsAggregator;
