//! Per-unit-of-work event buffer.

use kcmetrics_core::{AdminEvent, Event};

/// Turns buffered events into counter increments.
///
/// An aggregator sees events only after the unit of work that produced them
/// committed. Counting must never fail: anything that goes wrong is logged
/// and the increment skipped.
pub trait Aggregator: Send {
    /// Short name used in logs and self-metrics.
    fn name(&self) -> &'static str;

    /// Whether a user event is buffered at all.
    fn accepts_event(&self, _event: &Event) -> bool {
        true
    }

    /// Whether an admin event is buffered at all.
    fn accepts_admin_event(&self, _event: &AdminEvent) -> bool {
        true
    }

    fn count_event(&self, event: &Event);

    fn count_admin_event(&self, event: &AdminEvent, include_representation: bool);
}

/// Events received during one unit of work, in arrival order.
///
/// Owned by exactly one listener inside exactly one unit of work, so it
/// needs no locking. [`EventBuffer::flush`] consumes the buffer, which makes
/// a second flush impossible.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<Event>,
    admin_events: Vec<(AdminEvent, bool)>,
}

impl EventBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn add_admin_event(&mut self, event: AdminEvent, include_representation: bool) {
        self.admin_events.push((event, include_representation));
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn admin_event_count(&self) -> usize {
        self.admin_events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.admin_events.is_empty()
    }

    /// Hand every buffered event to `aggregator`: admin events first, then
    /// user events, each in arrival order.
    pub fn flush<A: Aggregator + ?Sized>(self, aggregator: &A) {
        for (event, include_representation) in &self.admin_events {
            aggregator.count_admin_event(event, *include_representation);
        }
        for event in &self.events {
            aggregator.count_event(event);
        }
    }
}
