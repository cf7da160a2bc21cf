use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use kcmetrics_core::{Counter, MeterId, MeterRegistry, MetricsError, MetricsResult};
use parking_lot::Mutex;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

struct PrometheusCounter(IntCounter);

impl Counter for PrometheusCounter {
    fn increment(&self) {
        self.0.inc();
    }

    fn count(&self) -> u64 {
        self.0.get()
    }
}

struct Family {
    label_names: Vec<String>,
    counters: IntCounterVec,
}

/// `MeterRegistry` backed by Prometheus counter families.
///
/// Each meter name maps to one `IntCounterVec` whose labels are the sorted,
/// sanitized tag keys. A family keeps the label set it was created with;
/// asking for the same name with other tag keys is an error.
pub struct PrometheusMeterRegistry {
    registry: Registry,
    families: Mutex<HashMap<String, Family>>,
}

impl PrometheusMeterRegistry {
    /// Registry with its own, empty `prometheus::Registry`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Publish into an existing registry, e.g. one shared with other components.
    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            families: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode every family in the Prometheus text exposition format.
    pub fn render(&self) -> MetricsResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for PrometheusMeterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterRegistry for PrometheusMeterRegistry {
    fn counter(&self, id: &MeterId) -> MetricsResult<Arc<dyn Counter>> {
        let name = prometheus_name(id);

        let mut labels: Vec<(String, &str)> = id
            .tags
            .iter()
            .map(|tag| (prometheus_label(&tag.key), tag.value.as_str()))
            .collect();
        labels.sort();
        let label_names: Vec<String> = labels.iter().map(|(key, _)| key.clone()).collect();

        let mut families = self.families.lock();
        let family = match families.entry(name) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let help = match id.description {
                    Some(description) => description.to_string(),
                    None => id.name.to_string(),
                };
                let names: Vec<&str> = label_names.iter().map(String::as_str).collect();
                let counters = IntCounterVec::new(Opts::new(entry.key().as_str(), help), &names)?;
                self.registry.register(Box::new(counters.clone()))?;
                entry.insert(Family {
                    label_names: label_names.clone(),
                    counters,
                })
            }
        };

        if family.label_names != label_names {
            return Err(MetricsError::incompatible_series(
                id.name.to_string(),
                family.label_names.clone(),
                label_names,
            ));
        }

        let values: Vec<&str> = labels.iter().map(|(_, value)| *value).collect();
        let counter: Arc<dyn Counter> = Arc::new(PrometheusCounter(
            family.counters.get_metric_with_label_values(&values)?,
        ));
        Ok(counter)
    }
}

/// Prometheus family name for a dotted meter name.
///
/// `keycloak.event.login` becomes `keycloak_event_login_total`; a base unit
/// is inserted before the suffix (`keycloak.user` with unit `events` becomes
/// `keycloak_user_events_total`).
#[must_use]
pub fn prometheus_name(id: &MeterId) -> String {
    let mut name = sanitize(&id.name);
    if let Some(unit) = id.base_unit {
        let unit = sanitize(unit);
        if !name.ends_with(&format!("_{unit}")) {
            name.push('_');
            name.push_str(&unit);
        }
    }
    if !name.ends_with("_total") {
        name.push_str("_total");
    }
    name
}

/// Prometheus label name for a tag key (`client.id` becomes `client_id`).
#[must_use]
pub fn prometheus_label(key: &str) -> String {
    sanitize(key)
}

fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_name() {
        assert_eq!(
            prometheus_name(&MeterId::counter("keycloak.event.login.attempt")),
            "keycloak_event_login_attempt_total"
        );
        assert_eq!(
            prometheus_name(&MeterId::counter("keycloak.user").base_unit("events")),
            "keycloak_user_events_total"
        );
        assert_eq!(prometheus_name(&MeterId::counter("x_total")), "x_total");
    }

    #[test]
    fn test_prometheus_label() {
        assert_eq!(prometheus_label("client.id"), "client_id");
        assert_eq!(prometheus_label("realm"), "realm");
        assert_eq!(prometheus_label("1st"), "_1st");
    }

    #[test]
    fn test_counter_is_shared_per_series() {
        let registry = PrometheusMeterRegistry::new();
        let id = MeterId::counter("keycloak.event.logout").tag("realm", "demo");

        registry.counter(&id).unwrap().increment();
        registry.counter(&id).unwrap().increment();

        assert_eq!(registry.counter(&id).unwrap().count(), 2);
    }

    #[test]
    fn test_incompatible_tag_shape() {
        let registry = PrometheusMeterRegistry::new();
        registry
            .counter(&MeterId::counter("keycloak.user").tag("event", "login").tag("realm", "a"))
            .unwrap();

        let err = registry
            .counter(&MeterId::counter("keycloak.user").tag("event", "login"))
            .err()
            .unwrap();
        assert!(matches!(err, MetricsError::IncompatibleSeries { .. }));
    }

    #[test]
    fn test_render() {
        let registry = PrometheusMeterRegistry::new();
        registry
            .counter(
                &MeterId::counter("keycloak.event.login")
                    .tag("realm", "demo")
                    .tag("client.id", "app1"),
            )
            .unwrap()
            .increment();

        let text = registry.render().unwrap();
        assert!(text.contains("# TYPE keycloak_event_login_total counter"));
        assert!(text.contains("client_id=\"app1\""));
        assert!(text.contains("realm=\"demo\""));
    }
}
