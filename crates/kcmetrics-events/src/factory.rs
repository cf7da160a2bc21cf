//! Listener factories and the pipeline that opens units of work.

use std::collections::HashSet;
use std::sync::Arc;

use kcmetrics_core::{
    naming, EventMetricsConfig, EventType, MeterRegistry, MetricsConfig, MetricsResult,
    UserEventMetricsConfig,
};
use tracing::info;

use crate::event_metrics::{self, EventMetricsAggregator};
use crate::listener::BufferedEventListener;
use crate::unit_of_work::UnitOfWork;
use crate::user_event_metrics::{self, UserEventMetricsAggregator};

/// Creates one listener per unit of work.
pub trait EventListenerFactory: Send + Sync {
    fn id(&self) -> &'static str;

    /// Create a listener for `uow`; it enlists itself before returning.
    fn create(&self, uow: &mut UnitOfWork);
}

/// Factory for per-type counters.
pub struct EventMetricsListenerFactory {
    registry: Arc<dyn MeterRegistry>,
    included_events: Arc<HashSet<EventType>>,
    admin_events: bool,
}

impl EventMetricsListenerFactory {
    pub fn new(registry: Arc<dyn MeterRegistry>, config: &EventMetricsConfig) -> Self {
        naming::init();
        Self {
            registry,
            included_events: Arc::new(config.included_events()),
            admin_events: config.admin_events,
        }
    }
}

impl EventListenerFactory for EventMetricsListenerFactory {
    fn id(&self) -> &'static str {
        event_metrics::LISTENER_NAME
    }

    fn create(&self, uow: &mut UnitOfWork) {
        BufferedEventListener::enlist(
            uow,
            EventMetricsAggregator::new(
                Arc::clone(&self.registry),
                Arc::clone(&self.included_events),
                self.admin_events,
            ),
        );
    }
}

/// Factory for the shared `keycloak.user` counter.
pub struct UserEventMetricsListenerFactory {
    template: UserEventMetricsAggregator,
}

impl UserEventMetricsListenerFactory {
    pub fn new(registry: Arc<dyn MeterRegistry>, config: &UserEventMetricsConfig) -> Self {
        naming::init();
        Self {
            template: UserEventMetricsAggregator::new(registry, config),
        }
    }
}

impl EventListenerFactory for UserEventMetricsListenerFactory {
    fn id(&self) -> &'static str {
        user_event_metrics::LISTENER_NAME
    }

    fn create(&self, uow: &mut UnitOfWork) {
        BufferedEventListener::enlist(uow, self.template.clone());
    }
}

/// Entry point for embedding applications.
///
/// Holds the enabled listener factories; [`begin`](MetricsPipeline::begin)
/// opens a unit of work with one fresh listener from each.
#[derive(Default)]
pub struct MetricsPipeline {
    factories: Vec<Box<dyn EventListenerFactory>>,
}

impl MetricsPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the listeners enabled in `config`, all writing to `registry`.
    pub fn from_config(
        config: &MetricsConfig,
        registry: Arc<dyn MeterRegistry>,
    ) -> MetricsResult<Self> {
        config.validate()?;

        let mut pipeline = Self::new();
        if config.event_metrics.enabled {
            pipeline = pipeline.with_factory(EventMetricsListenerFactory::new(
                Arc::clone(&registry),
                &config.event_metrics,
            ));
        }
        if config.user_event_metrics.enabled {
            pipeline = pipeline.with_factory(UserEventMetricsListenerFactory::new(
                Arc::clone(&registry),
                &config.user_event_metrics,
            ));
        }

        info!(listeners = ?pipeline.listener_ids(), "event metrics pipeline ready");
        Ok(pipeline)
    }

    #[must_use]
    pub fn with_factory(mut self, factory: impl EventListenerFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    pub fn listener_ids(&self) -> Vec<&'static str> {
        self.factories.iter().map(|factory| factory.id()).collect()
    }

    /// Open a unit of work with every listener enlisted.
    #[must_use]
    pub fn begin(&self) -> UnitOfWork {
        let mut uow = UnitOfWork::new();
        for factory in &self.factories {
            factory.create(&mut uow);
        }
        uow
    }
}
