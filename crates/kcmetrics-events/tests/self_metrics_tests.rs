//! Pipeline self-metrics read back through the Prometheus default registry.
//!
//! Kept to a single test: the self-metrics are process-global and the
//! assertions compare before/after values.

use std::sync::Arc;

use kcmetrics_core::{Event, EventType, MetricsConfig, UserEventMetricsConfig, UserEventTag};
use kcmetrics_events::{MetricsPipeline, PrometheusMeterRegistry, SimpleMeterRegistry};

const LISTENER: &str = "event-metrics";

/// Sum of every sample of `family` whose labels include all of `labels`.
fn gathered(family: &str, labels: &[(&str, &str)]) -> u64 {
    prometheus::gather()
        .iter()
        .filter(|metric_family| metric_family.get_name() == family)
        .flat_map(|metric_family| metric_family.get_metric().iter())
        .filter(|metric| {
            labels.iter().all(|(name, value)| {
                metric
                    .get_label()
                    .iter()
                    .any(|pair| pair.get_name() == *name && pair.get_value() == *value)
            })
        })
        .map(|metric| metric.get_counter().get_value() as u64)
        .sum()
}

fn user_only(tags: Vec<UserEventTag>) -> MetricsConfig {
    let mut config = MetricsConfig::default();
    config.event_metrics.enabled = false;
    config.user_event_metrics = UserEventMetricsConfig {
        enabled: true,
        tags,
        events: None,
    };
    config
}

#[test]
fn test_self_metrics_track_pipeline_outcomes() {
    // Rollback of N events is reported as discarded
    let mut config = MetricsConfig::default();
    config.event_metrics.events = Some(vec![EventType::Login]);
    let pipeline =
        MetricsPipeline::from_config(&config, Arc::new(SimpleMeterRegistry::new())).unwrap();

    let discarded = [("listener", LISTENER), ("kind", "user")];
    let before = gathered("kcmetrics_events_discarded_total", &discarded);
    let mut uow = pipeline.begin();
    for _ in 0..4 {
        uow.send(&Event::new(EventType::Login));
    }
    uow.rollback();
    assert_eq!(gathered("kcmetrics_events_discarded_total", &discarded), before + 4);

    // Event types outside the enabled set are reported as filtered
    let filtered = [("listener", LISTENER), ("kind", "user")];
    let before = gathered("kcmetrics_events_filtered_total", &filtered);
    let mut uow = pipeline.begin();
    uow.send(&Event::new(EventType::Logout));
    uow.send(&Event::new(EventType::Login));
    uow.commit();
    assert_eq!(gathered("kcmetrics_events_filtered_total", &filtered), before + 1);

    // A label-shape conflict in the backend is reported as a registry error
    let registry = Arc::new(PrometheusMeterRegistry::new());
    let with_realm =
        MetricsPipeline::from_config(&user_only(vec![UserEventTag::Realm]), registry.clone())
            .unwrap();
    let without_realm =
        MetricsPipeline::from_config(&user_only(Vec::new()), registry.clone()).unwrap();

    let mut uow = with_realm.begin();
    uow.send(&Event::new(EventType::Login).with_realm_name("demo"));
    uow.commit();

    let before = gathered("kcmetrics_registry_errors_total", &[]);
    let mut uow = without_realm.begin();
    uow.send(&Event::new(EventType::Login).with_realm_name("demo"));
    uow.commit();
    assert_eq!(gathered("kcmetrics_registry_errors_total", &[]), before + 1);
}
