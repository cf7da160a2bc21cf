//! Per-type counters: one counter name per event type and admin operation.

use std::collections::HashSet;
use std::sync::Arc;

use kcmetrics_core::event::errors::CLIENT_NOT_FOUND;
use kcmetrics_core::naming::{
    admin_counter_name, event_counter_name, LOGIN_ATTEMPT_COUNTER_NAME, LOGIN_COUNTER_NAME,
    LOGIN_ERROR_COUNTER_NAME,
};
use kcmetrics_core::tags::{
    CLIENT_ID_TAG, ERROR_TAG, PROVIDER_KEYCLOAK_OPENID, PROVIDER_TAG, REALM_TAG, RESOURCE_TAG,
};
use kcmetrics_core::{null_to_empty, AdminEvent, Event, EventType, MeterId, MeterRegistry, Tags};
use tracing::debug;

use crate::buffer::Aggregator;
use crate::classifier::CountingBehavior;
use crate::registry::increment;

pub const LISTENER_NAME: &str = "event-metrics";

/// Counts user events per type and admin events per operation.
pub struct EventMetricsAggregator {
    registry: Arc<dyn MeterRegistry>,
    included_events: Arc<HashSet<EventType>>,
    admin_events: bool,
}

impl EventMetricsAggregator {
    pub fn new(
        registry: Arc<dyn MeterRegistry>,
        included_events: Arc<HashSet<EventType>>,
        admin_events: bool,
    ) -> Self {
        Self {
            registry,
            included_events,
            admin_events,
        }
    }

    fn count_login(&self, event: &Event) {
        let tags = realm_provider_client(event, null_to_empty(event.client_id.as_deref()));
        self.increment(MeterId::counter(LOGIN_ATTEMPT_COUNTER_NAME).tags(tags.clone()));
        self.increment(MeterId::counter(LOGIN_COUNTER_NAME).tags(tags));
    }

    fn count_login_error(&self, event: &Event) {
        let tags = realm_provider_client(event, error_client_id(event));
        self.increment(MeterId::counter(LOGIN_ATTEMPT_COUNTER_NAME).tags(tags.clone()));
        self.increment(
            MeterId::counter(LOGIN_ERROR_COUNTER_NAME)
                .tags(tags)
                .tag(ERROR_TAG, null_to_empty(event.error.as_deref())),
        );
    }

    fn count_provider_client(&self, event: &Event) {
        let tags = realm_provider_client(event, null_to_empty(event.client_id.as_deref()));
        self.increment(MeterId::counter(event_counter_name(event.event_type)).tags(tags));
    }

    fn count_provider_client_error(&self, event: &Event) {
        let tags = realm_provider_client(event, error_client_id(event));
        self.increment(
            MeterId::counter(event_counter_name(event.event_type))
                .tags(tags)
                .tag(ERROR_TAG, null_to_empty(event.error.as_deref())),
        );
    }

    fn count_realm(&self, event: &Event) {
        self.increment(
            MeterId::counter(event_counter_name(event.event_type))
                .tag(REALM_TAG, null_to_empty(event.realm_name.as_deref())),
        );
    }

    fn increment(&self, id: MeterId) {
        increment(self.registry.as_ref(), &id);
    }
}

impl Aggregator for EventMetricsAggregator {
    fn name(&self) -> &'static str {
        LISTENER_NAME
    }

    fn accepts_event(&self, event: &Event) -> bool {
        self.included_events.contains(&event.event_type)
    }

    fn accepts_admin_event(&self, _event: &AdminEvent) -> bool {
        self.admin_events
    }

    fn count_event(&self, event: &Event) {
        debug!(
            event_type = %event.event_type,
            realm = ?event.realm_name,
            "received user event"
        );

        match CountingBehavior::of(event.event_type) {
            CountingBehavior::Login => self.count_login(event),
            CountingBehavior::LoginError => self.count_login_error(event),
            CountingBehavior::ProviderClient => self.count_provider_client(event),
            CountingBehavior::ProviderClientError => self.count_provider_client_error(event),
            CountingBehavior::RealmOnly => self.count_realm(event),
        }
    }

    fn count_admin_event(&self, event: &AdminEvent, _include_representation: bool) {
        debug!(
            operation = %event.operation_type,
            resource = %event.resource_type,
            realm = ?event.realm_name,
            "received admin event"
        );

        self.increment(
            MeterId::counter(admin_counter_name(event.operation_type))
                .tag(REALM_TAG, null_to_empty(event.realm_name.as_deref()))
                .tag(RESOURCE_TAG, event.resource_type.as_str()),
        );
    }
}

fn realm_provider_client(event: &Event, client_id: &str) -> Tags {
    Tags::empty()
        .and(REALM_TAG, null_to_empty(event.realm_name.as_deref()))
        .and(PROVIDER_TAG, identity_provider(event))
        .and(CLIENT_ID_TAG, client_id)
}

fn identity_provider(event: &Event) -> &str {
    event.identity_provider().unwrap_or(PROVIDER_KEYCLOAK_OPENID)
}

/// Unknown clients collapse into one series instead of one per bogus id.
fn error_client_id(event: &Event) -> &str {
    if event.is_client_not_found() {
        CLIENT_NOT_FOUND
    } else {
        null_to_empty(event.client_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcmetrics_core::event::details::IDENTITY_PROVIDER;

    #[test]
    fn test_identity_provider_defaults_to_keycloak() {
        let event = Event::new(EventType::Login);
        assert_eq!(identity_provider(&event), "keycloak");

        let event = event.with_detail(IDENTITY_PROVIDER, "github");
        assert_eq!(identity_provider(&event), "github");
    }

    #[test]
    fn test_error_client_id() {
        let event = Event::new(EventType::LoginError).with_client_id("app1");
        assert_eq!(error_client_id(&event), "app1");

        let event = event.with_error(CLIENT_NOT_FOUND);
        assert_eq!(error_client_id(&event), "client_not_found");

        let event = Event::new(EventType::LoginError).with_error("invalid_user_credentials");
        assert_eq!(error_client_id(&event), "");
    }
}
