//! One shared `keycloak.user` counter, split by tags.
//!
//! Success and failure of the same flow share the `event` tag and differ in
//! `error`. The realm, idp and client id tags are each optional; a disabled
//! tag is left out of the series entirely rather than set to an empty value.

use std::collections::HashSet;
use std::sync::Arc;

use kcmetrics_core::metrics::{EVENTS_FILTERED, KIND_USER};
use kcmetrics_core::naming::{event_tag, USER_EVENTS_METER_NAME};
use kcmetrics_core::tags::{CLIENT_ID_TAG, ERROR_TAG, EVENT_TAG, IDP_TAG, REALM_TAG, UNKNOWN};
use kcmetrics_core::{null_to_empty, AdminEvent, Event, MeterId, MeterRegistry, UserEventMetricsConfig};
use tracing::debug;

use crate::buffer::Aggregator;
use crate::registry::increment;

pub const LISTENER_NAME: &str = "user-event-metrics";

const DESCRIPTION_OF_EVENT_METER: &str = "Keycloak user events";
const BASE_UNIT_EVENTS: &str = "events";

#[derive(Clone)]
pub struct UserEventMetricsAggregator {
    registry: Arc<dyn MeterRegistry>,
    with_realm: bool,
    with_idp: bool,
    with_client_id: bool,
    events: Option<Arc<HashSet<String>>>,
}

impl UserEventMetricsAggregator {
    pub fn new(registry: Arc<dyn MeterRegistry>, config: &UserEventMetricsConfig) -> Self {
        Self {
            registry,
            with_realm: config.with_realm(),
            with_idp: config.with_idp(),
            with_client_id: config.with_client_id(),
            events: config.allowed_events().map(Arc::new),
        }
    }
}

impl Aggregator for UserEventMetricsAggregator {
    fn name(&self) -> &'static str {
        LISTENER_NAME
    }

    fn accepts_admin_event(&self, _event: &AdminEvent) -> bool {
        false
    }

    fn count_event(&self, event: &Event) {
        debug!(
            event_type = %event.event_type,
            realm = ?event.realm_name,
            "received user event"
        );

        let tag = event_tag(event.event_type);
        if let Some(events) = &self.events {
            if !events.contains(&*tag) {
                debug!(event = %tag, "event not in allow-list, skipping");
                EVENTS_FILTERED
                    .with_label_values(&[LISTENER_NAME, KIND_USER])
                    .inc();
                return;
            }
        }

        let mut id = MeterId::counter(USER_EVENTS_METER_NAME)
            .description(DESCRIPTION_OF_EVENT_METER)
            .base_unit(BASE_UNIT_EVENTS)
            .tag(EVENT_TAG, tag)
            .tag(ERROR_TAG, error(event));

        if self.with_realm {
            id = id.tag(REALM_TAG, null_to_empty(event.realm_name.as_deref()));
        }
        if self.with_idp {
            id = id.tag(IDP_TAG, null_to_empty(event.identity_provider()));
        }
        if self.with_client_id {
            id = id.tag(CLIENT_ID_TAG, client_id(event));
        }

        increment(self.registry.as_ref(), &id);
    }

    fn count_admin_event(&self, _event: &AdminEvent, _include_representation: bool) {}
}

fn client_id(event: &Event) -> &str {
    if event.is_client_not_found() {
        UNKNOWN
    } else {
        null_to_empty(event.client_id.as_deref())
    }
}

/// A failure type without an error code still gets a non-empty error tag.
fn error(event: &Event) -> &str {
    match event.error.as_deref() {
        Some(error) => error,
        None if event.event_type.is_error() => UNKNOWN,
        None => "",
    }
}
