//! Core domain types and contracts for event metrics.

#[macro_use]
mod symbolic;

pub mod admin;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod meter;
pub mod metrics;
pub mod naming;
pub mod tags;
pub mod traits;

pub use admin::{AdminEvent, AuthDetails, OperationType, ResourceType};
pub use crate::config::{EventMetricsConfig, MetricsConfig, UserEventMetricsConfig, UserEventTag};
pub use error::{MetricsError, MetricsResult};
pub use event::{Event, EventType};
pub use ids::{AdminEventId, EventId};
pub use meter::MeterId;
pub use tags::{null_to_empty, Tag, Tags};
pub use traits::{Counter, MeterRegistry};
