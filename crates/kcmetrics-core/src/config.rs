//! Configuration management for event metrics
//!
//! Settings are merged from, in increasing precedence:
//! - Hardcoded defaults
//! - `/etc/kcmetrics/kcmetrics.{toml,yaml,json}`
//! - `./config/kcmetrics.{toml,yaml,json}`
//! - The file named by the `KCMETRICS_CONFIG` env var
//! - `KCMETRICS__*` environment variables

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MetricsError, MetricsResult};
use crate::event::EventType;
use crate::naming;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub event_metrics: EventMetricsConfig,

    #[serde(default)]
    pub user_event_metrics: UserEventMetricsConfig,
}

impl MetricsConfig {
    /// Load configuration from every source, then validate it.
    pub fn load() -> MetricsResult<Self> {
        let mut builder = Self::set_defaults(Config::builder())?
            .add_source(File::with_name("/etc/kcmetrics/kcmetrics").required(false))
            .add_source(File::with_name("./config/kcmetrics").required(false));

        if let Ok(config_path) = std::env::var("KCMETRICS_CONFIG") {
            builder = builder.add_source(File::with_name(&config_path).required(false));
        }

        // Example: KCMETRICS__USER_EVENT_METRICS__TAGS=realm,idp
        builder = builder.add_source(
            Environment::with_prefix("KCMETRICS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("event_metrics.events")
                .with_list_parse_key("user_event_metrics.tags")
                .with_list_parse_key("user_event_metrics.events")
                .try_parsing(true),
        );

        let config: MetricsConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn set_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("event_metrics.enabled", true)?
            .set_default("event_metrics.admin_events", true)?
            .set_default("user_event_metrics.enabled", false)?
            .set_default("user_event_metrics.tags", vec![UserEventTag::Realm.as_str()])
    }

    /// Load configuration from a single file; missing keys take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        let config: MetricsConfig = Self::set_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings under which an enabled listener could count nothing.
    pub fn validate(&self) -> MetricsResult<()> {
        if let Some(events) = &self.event_metrics.events {
            if events.is_empty() && self.event_metrics.enabled && !self.event_metrics.admin_events {
                return Err(MetricsError::invalid_config(
                    "event_metrics is enabled but counts neither user nor admin events",
                ));
            }
        }

        // Unmatched allow-list entries never match an event; they are kept.
        if let Some(events) = &self.user_event_metrics.events {
            for event in events {
                if !naming::is_known_event_tag(event) {
                    warn!(
                        event = %event,
                        "user_event_metrics.events entry is not the tag of any event type"
                    );
                }
            }
        }

        Ok(())
    }
}

/// Per-type counters (`keycloak.event.*`, `keycloak.admin.event.*`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventMetricsConfig {
    pub enabled: bool,

    /// Event types to count; every type when unset
    #[serde(default)]
    pub events: Option<Vec<EventType>>,

    /// Count admin events per operation
    pub admin_events: bool,
}

impl Default for EventMetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            events: None,
            admin_events: true,
        }
    }
}

impl EventMetricsConfig {
    /// Event types the listener buffers.
    pub fn included_events(&self) -> HashSet<EventType> {
        match &self.events {
            Some(events) => events.iter().copied().collect(),
            None => EventType::ALL.iter().copied().collect(),
        }
    }
}

/// Optional tags of the shared `keycloak.user` counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UserEventTag {
    Realm,
    Idp,
    ClientId,
}

impl UserEventTag {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserEventTag::Realm => "realm",
            UserEventTag::Idp => "idp",
            UserEventTag::ClientId => "clientId",
        }
    }
}

impl FromStr for UserEventTag {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "realm" => Ok(UserEventTag::Realm),
            "idp" => Ok(UserEventTag::Idp),
            "clientId" => Ok(UserEventTag::ClientId),
            other => Err(MetricsError::UnknownUserEventTag(other.to_string())),
        }
    }
}

/// Shared counter (`keycloak.user`) distinguished by tags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserEventMetricsConfig {
    pub enabled: bool,

    /// Optional tags to attach; high cardinality ones are off by default
    pub tags: Vec<UserEventTag>,

    /// Allow-list of event tag values (e.g. `login`); every event when unset
    #[serde(default)]
    pub events: Option<Vec<String>>,
}

impl Default for UserEventMetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tags: vec![UserEventTag::Realm],
            events: None,
        }
    }
}

impl UserEventMetricsConfig {
    pub fn with_realm(&self) -> bool {
        self.tags.contains(&UserEventTag::Realm)
    }

    pub fn with_idp(&self) -> bool {
        self.tags.contains(&UserEventTag::Idp)
    }

    pub fn with_client_id(&self) -> bool {
        self.tags.contains(&UserEventTag::ClientId)
    }

    /// The allow-list as a set, `None` when every event is counted.
    pub fn allowed_events(&self) -> Option<HashSet<String>> {
        self.events
            .as_ref()
            .map(|events| events.iter().cloned().collect())
    }
}
