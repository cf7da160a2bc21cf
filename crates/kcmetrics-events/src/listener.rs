use kcmetrics_core::metrics::{EVENTS_DISCARDED, EVENTS_FILTERED, EVENTS_FLUSHED, KIND_ADMIN, KIND_USER};
use kcmetrics_core::{AdminEvent, Event};
use tracing::debug;

use crate::buffer::{Aggregator, EventBuffer};
use crate::unit_of_work::{EventListener, UnitOfWork};

/// Buffers events for one unit of work and counts them on commit.
pub struct BufferedEventListener<A> {
    buffer: EventBuffer,
    aggregator: A,
}

impl<A: Aggregator + 'static> BufferedEventListener<A> {
    /// Create a listener and enlist it with `uow` in one step.
    pub fn enlist(uow: &mut UnitOfWork, aggregator: A) {
        uow.enlist_after_completion(Box::new(Self {
            buffer: EventBuffer::new(),
            aggregator,
        }));
    }
}

impl<A: Aggregator> EventListener for BufferedEventListener<A> {
    fn on_event(&mut self, event: &Event) {
        if self.aggregator.accepts_event(event) {
            self.buffer.add_event(event.clone());
        } else {
            EVENTS_FILTERED
                .with_label_values(&[self.aggregator.name(), KIND_USER])
                .inc();
        }
    }

    fn on_admin_event(&mut self, event: &AdminEvent, include_representation: bool) {
        if self.aggregator.accepts_admin_event(event) {
            self.buffer.add_admin_event(event.clone(), include_representation);
        } else {
            EVENTS_FILTERED
                .with_label_values(&[self.aggregator.name(), KIND_ADMIN])
                .inc();
        }
    }

    fn after_commit(self: Box<Self>) {
        let Self { buffer, aggregator } = *self;
        let name = aggregator.name();

        EVENTS_FLUSHED
            .with_label_values(&[name, KIND_USER])
            .inc_by(buffer.event_count() as u64);
        EVENTS_FLUSHED
            .with_label_values(&[name, KIND_ADMIN])
            .inc_by(buffer.admin_event_count() as u64);

        buffer.flush(&aggregator);
    }

    fn after_rollback(self: Box<Self>) {
        let name = self.aggregator.name();
        let events = self.buffer.event_count();
        let admin_events = self.buffer.admin_event_count();

        if events + admin_events > 0 {
            debug!(
                listener = name,
                events, admin_events, "discarding buffered events after rollback"
            );
        }

        EVENTS_DISCARDED
            .with_label_values(&[name, KIND_USER])
            .inc_by(events as u64);
        EVENTS_DISCARDED
            .with_label_values(&[name, KIND_ADMIN])
            .inc_by(admin_events as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcmetrics_core::{EventType, OperationType, ResourceType};
    use std::sync::{Arc, Mutex};

    /// Records counted events; each test uses its own name so the shared
    /// self-metric series do not interfere.
    struct Tally {
        name: &'static str,
        accept_user: bool,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Aggregator for Tally {
        fn name(&self) -> &'static str {
            self.name
        }

        fn accepts_event(&self, _event: &Event) -> bool {
            self.accept_user
        }

        fn count_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.event_type.to_string());
        }

        fn count_admin_event(&self, event: &AdminEvent, _include_representation: bool) {
            self.seen.lock().unwrap().push(event.operation_type.to_string());
        }
    }

    fn enlisted(name: &'static str, accept_user: bool) -> (UnitOfWork, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut uow = UnitOfWork::new();
        BufferedEventListener::enlist(
            &mut uow,
            Tally {
                name,
                accept_user,
                seen: Arc::clone(&seen),
            },
        );
        (uow, seen)
    }

    fn series(counter: &prometheus::IntCounterVec, name: &str, kind: &str) -> u64 {
        counter.with_label_values(&[name, kind]).get()
    }

    #[test]
    fn test_commit_flushes_buffer() {
        let name = "listener-test-commit";
        let (mut uow, seen) = enlisted(name, true);
        uow.send(&Event::new(EventType::Login));
        uow.send(&Event::new(EventType::Logout));
        uow.send_admin(&AdminEvent::new(OperationType::Update, ResourceType::Realm), false);

        assert!(seen.lock().unwrap().is_empty());
        uow.commit();

        assert_eq!(*seen.lock().unwrap(), vec!["UPDATE", "LOGIN", "LOGOUT"]);
        assert_eq!(series(&EVENTS_FLUSHED, name, KIND_USER), 2);
        assert_eq!(series(&EVENTS_FLUSHED, name, KIND_ADMIN), 1);
        assert_eq!(series(&EVENTS_DISCARDED, name, KIND_USER), 0);
    }

    #[test]
    fn test_rollback_discards_buffer() {
        let name = "listener-test-rollback";
        let (mut uow, seen) = enlisted(name, true);
        for _ in 0..3 {
            uow.send(&Event::new(EventType::Login));
        }
        uow.rollback();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(series(&EVENTS_DISCARDED, name, KIND_USER), 3);
        assert_eq!(series(&EVENTS_FLUSHED, name, KIND_USER), 0);
    }

    #[test]
    fn test_rejected_events_are_not_buffered() {
        let name = "listener-test-filter";
        let (mut uow, seen) = enlisted(name, false);
        uow.send(&Event::new(EventType::Login));
        uow.send(&Event::new(EventType::Register));
        uow.commit();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(series(&EVENTS_FILTERED, name, KIND_USER), 2);
        assert_eq!(series(&EVENTS_FLUSHED, name, KIND_USER), 0);
    }
}
