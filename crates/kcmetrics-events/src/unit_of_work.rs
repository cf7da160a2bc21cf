//! Request-scoped unit of work that decides whether buffered events count.

use std::mem;

use kcmetrics_core::{AdminEvent, Event};
use tracing::debug;

/// A participant that receives events during a unit of work and is told how
/// the unit of work ended.
pub trait EventListener: Send {
    fn on_event(&mut self, event: &Event);

    fn on_admin_event(&mut self, event: &AdminEvent, include_representation: bool);

    /// Called once, after the unit of work completed successfully.
    fn after_commit(self: Box<Self>);

    /// Called once, when the unit of work rolled back or was abandoned.
    fn after_rollback(self: Box<Self>) {}
}

/// One unit of work, typically one request.
///
/// Listeners enlist when they are created and are owned by the unit of work
/// from then on. Completing consumes the unit of work, so the completion
/// hooks fire at most once. Dropping it without calling [`commit`] counts as
/// a rollback.
///
/// [`commit`]: UnitOfWork::commit
#[derive(Default)]
pub struct UnitOfWork {
    listeners: Vec<Box<dyn EventListener>>,
}

impl UnitOfWork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener whose `after_commit` runs only on success.
    pub fn enlist_after_completion(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver a user event to every enlisted listener.
    pub fn send(&mut self, event: &Event) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    /// Deliver an admin event to every enlisted listener.
    pub fn send_admin(&mut self, event: &AdminEvent, include_representation: bool) {
        for listener in &mut self.listeners {
            listener.on_admin_event(event, include_representation);
        }
    }

    /// Complete successfully; listeners run in enlistment order.
    pub fn commit(mut self) {
        for listener in mem::take(&mut self.listeners) {
            listener.after_commit();
        }
    }

    /// Abort; buffered events are discarded.
    pub fn rollback(mut self) {
        self.discard();
    }

    fn discard(&mut self) {
        for listener in mem::take(&mut self.listeners) {
            listener.after_rollback();
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if !self.listeners.is_empty() {
            debug!(
                listeners = self.listeners.len(),
                "unit of work dropped without completion, rolling back"
            );
            self.discard();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcmetrics_core::EventType;
    use std::sync::{Arc, Mutex};

    /// Records lifecycle calls into a shared log.
    struct Probe {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl EventListener for Probe {
        fn on_event(&mut self, event: &Event) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:event:{}", self.label, event.event_type));
        }

        fn on_admin_event(&mut self, _event: &AdminEvent, _include_representation: bool) {
            self.log.lock().unwrap().push(format!("{}:admin", self.label));
        }

        fn after_commit(self: Box<Self>) {
            self.log.lock().unwrap().push(format!("{}:commit", self.label));
        }

        fn after_rollback(self: Box<Self>) {
            self.log.lock().unwrap().push(format!("{}:rollback", self.label));
        }
    }

    fn unit_of_work(log: &Arc<Mutex<Vec<String>>>) -> UnitOfWork {
        let mut uow = UnitOfWork::new();
        for label in ["a", "b"] {
            uow.enlist_after_completion(Box::new(Probe {
                label,
                log: Arc::clone(log),
            }));
        }
        uow
    }

    #[test]
    fn test_commit_runs_hooks_in_enlistment_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut uow = unit_of_work(&log);
        assert_eq!(uow.listener_count(), 2);

        uow.send(&Event::new(EventType::Login));
        uow.commit();

        let log = log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec!["a:event:LOGIN", "b:event:LOGIN", "a:commit", "b:commit"]
        );
    }

    #[test]
    fn test_rollback_never_commits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut uow = unit_of_work(&log);
        uow.send(&Event::new(EventType::Login));
        uow.rollback();

        let log = log.lock().unwrap().clone();
        assert!(log.iter().all(|entry| !entry.ends_with(":commit")));
        assert!(log.contains(&"a:rollback".to_string()));
    }

    #[test]
    fn test_drop_is_rollback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let _uow = unit_of_work(&log);
        }

        let log = log.lock().unwrap().clone();
        assert_eq!(log, vec!["a:rollback", "b:rollback"]);
    }
}
