//! Counter names derived from event symbols.
//!
//! Names follow the dotted lower-case convention: the symbolic constant is
//! lower-cased, every `_` becomes `.`, and a fixed namespace prefix is
//! prepended (`LOGIN_ERROR` -> `keycloak.event.login.error`).
//!
//! The tables below are built once over every enum value. Call [`init`]
//! during startup to pay that cost before the first request.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::admin::OperationType;
use crate::event::{EventType, ERROR_SUFFIX};

pub const EVENT_PREFIX: &str = "keycloak.event.";
pub const ADMIN_EVENT_PREFIX: &str = "keycloak.admin.event.";

pub const LOGIN_COUNTER_NAME: &str = "keycloak.event.login";
pub const LOGIN_ATTEMPT_COUNTER_NAME: &str = "keycloak.event.login.attempt";
pub const LOGIN_ERROR_COUNTER_NAME: &str = "keycloak.event.login.error";

/// Single counter shared by every user event in the tag-based strategy.
pub const USER_EVENTS_METER_NAME: &str = "keycloak.user";

/// Apply the naming convention to one symbolic constant.
#[must_use]
pub fn derive_name(prefix: &str, symbol: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + symbol.len());
    name.push_str(prefix);
    name.extend(
        symbol
            .chars()
            .map(|c| if c == '_' { '.' } else { c.to_ascii_lowercase() }),
    );
    name
}

/// Event tag value for the tag-based strategy: `_ERROR` stripped, lower-cased.
///
/// A success and its failure share one value (`LOGIN` and `LOGIN_ERROR` are
/// both `login`) and are told apart by the error tag instead.
#[must_use]
pub fn format_event_tag(event_type: EventType) -> String {
    let symbol = event_type.as_str();
    symbol
        .strip_suffix(ERROR_SUFFIX)
        .unwrap_or(symbol)
        .to_ascii_lowercase()
}

static EVENT_TYPE_TO_NAME: Lazy<HashMap<EventType, String>> = Lazy::new(|| {
    EventType::ALL
        .iter()
        .map(|event_type| (*event_type, derive_name(EVENT_PREFIX, event_type.as_str())))
        .collect()
});

static OPERATION_TYPE_TO_NAME: Lazy<HashMap<OperationType, String>> = Lazy::new(|| {
    OperationType::ALL
        .iter()
        .map(|operation| (*operation, derive_name(ADMIN_EVENT_PREFIX, operation.as_str())))
        .collect()
});

static EVENT_TYPE_TO_TAG: Lazy<HashMap<EventType, String>> = Lazy::new(|| {
    EventType::ALL
        .iter()
        .map(|event_type| (*event_type, format_event_tag(*event_type)))
        .collect()
});

/// Build every name table now instead of on first lookup.
pub fn init() {
    Lazy::force(&EVENT_TYPE_TO_NAME);
    Lazy::force(&OPERATION_TYPE_TO_NAME);
    Lazy::force(&EVENT_TYPE_TO_TAG);
    debug!(
        event_types = EVENT_TYPE_TO_NAME.len(),
        operations = OPERATION_TYPE_TO_NAME.len(),
        "meter name tables ready"
    );
}

/// Per-type counter name, e.g. `keycloak.event.refresh.token`.
#[must_use]
pub fn event_counter_name(event_type: EventType) -> Cow<'static, str> {
    match EVENT_TYPE_TO_NAME.get(&event_type) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(derive_name(EVENT_PREFIX, event_type.as_str())),
    }
}

/// Per-operation counter name, e.g. `keycloak.admin.event.create`.
#[must_use]
pub fn admin_counter_name(operation: OperationType) -> Cow<'static, str> {
    match OPERATION_TYPE_TO_NAME.get(&operation) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(derive_name(ADMIN_EVENT_PREFIX, operation.as_str())),
    }
}

/// Cached [`format_event_tag`].
#[must_use]
pub fn event_tag(event_type: EventType) -> Cow<'static, str> {
    match EVENT_TYPE_TO_TAG.get(&event_type) {
        Some(tag) => Cow::Borrowed(tag.as_str()),
        None => Cow::Owned(format_event_tag(event_type)),
    }
}

/// Whether `value` is the event tag of at least one event type.
#[must_use]
pub fn is_known_event_tag(value: &str) -> bool {
    EVENT_TYPE_TO_TAG.values().any(|tag| tag == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name() {
        assert_eq!(derive_name(EVENT_PREFIX, "LOGIN_ERROR"), "keycloak.event.login.error");
        assert_eq!(
            derive_name(ADMIN_EVENT_PREFIX, "ACTION"),
            "keycloak.admin.event.action"
        );
    }

    #[test]
    fn test_login_constants_match_convention() {
        assert_eq!(event_counter_name(EventType::Login), LOGIN_COUNTER_NAME);
        assert_eq!(
            event_counter_name(EventType::LoginError),
            LOGIN_ERROR_COUNTER_NAME
        );
    }

    #[test]
    fn test_tables_are_total() {
        init();
        assert_eq!(EVENT_TYPE_TO_NAME.len(), EventType::ALL.len());
        assert_eq!(OPERATION_TYPE_TO_NAME.len(), OperationType::ALL.len());
        assert_eq!(EVENT_TYPE_TO_TAG.len(), EventType::ALL.len());

        for event_type in EventType::ALL {
            assert!(matches!(event_counter_name(*event_type), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_event_tag_strips_error_suffix() {
        assert_eq!(event_tag(EventType::Login), "login");
        assert_eq!(event_tag(EventType::LoginError), "login");
        assert_eq!(event_tag(EventType::CodeToTokenError), "code_to_token");
        assert_eq!(
            event_tag(EventType::UserDisabledByTemporaryLockout),
            "user_disabled_by_temporary_lockout"
        );
    }

    #[test]
    fn test_known_event_tags() {
        assert!(is_known_event_tag("refresh_token"));
        assert!(!is_known_event_tag("refresh_token_error"));
        assert!(!is_known_event_tag("LOGIN"));
    }
}
