// event.rs - Named events with FIFO delivery to subscribed systems

use crate::ecs::SystemCell;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use tracing::warn;

/// A named event with a human-readable description.
pub struct Event {
    name: String,
    description: String,
}

impl Event {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Registry of events, their subscribed hooks and the pending firing queue.
///
/// The queue sits behind a RefCell so firing stays possible while systems
/// hold shared access to the world. Draining is driven by the world, which
/// also applies the command buffer between firings so hooks subscribed
/// mid-drain take effect for subsequent firings.
#[derive(Default)]
pub(crate) struct EventRegistry {
    events: HashMap<String, Event>,
    hooks: HashMap<String, Vec<SystemCell>>,
    queue: RefCell<VecDeque<String>>,
}

impl EventRegistry {
    /// Create the event if absent; re-registration warns and keeps the
    /// original description.
    pub fn register(&mut self, name: &str, description: &str) {
        if self.events.contains_key(name) {
            warn!("event {name} already registered");
            return;
        }
        self.events.insert(
            name.to_string(),
            Event {
                name: name.to_string(),
                description: description.to_string(),
            },
        );
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Subscribe a system; hooks run in subscription order.
    pub fn add_hook(&mut self, name: &str, system: SystemCell) {
        self.hooks.entry(name.to_string()).or_default().push(system);
    }

    /// Push one firing. Unknown names warn and are dropped.
    pub fn trigger(&self, name: &str) {
        if !self.events.contains_key(name) {
            warn!("event {name} does not exist");
            return;
        }
        self.queue.borrow_mut().push_back(name.to_string());
    }

    /// Dequeue the oldest pending firing.
    pub fn pop(&self) -> Option<String> {
        self.queue.borrow_mut().pop_front()
    }

    /// Snapshot of the hooks subscribed to an event, in subscription order.
    pub fn hooks_for(&self, name: &str) -> Vec<SystemCell> {
        self.hooks.get(name).map(|hooks| hooks.to_vec()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firings_are_consumed_fifo() {
        let mut events = EventRegistry::default();
        events.register("Boom", "test event");
        events.register("Crash", "another test event");
        events.trigger("Boom");
        events.trigger("Crash");
        events.trigger("Boom");
        assert_eq!(events.pop().as_deref(), Some("Boom"));
        assert_eq!(events.pop().as_deref(), Some("Crash"));
        assert_eq!(events.pop().as_deref(), Some("Boom"));
        assert_eq!(events.pop(), None);
    }

    #[test]
    fn unknown_trigger_is_dropped() {
        let events = EventRegistry::default();
        events.trigger("Nope");
        assert_eq!(events.pop(), None);
    }

    #[test]
    fn duplicate_registration_keeps_the_original() {
        let mut events = EventRegistry::default();
        events.register("Boom", "first");
        events.register("Boom", "second");
        assert!(events.is_registered("Boom"));
        assert_eq!(events.events.get("Boom").unwrap().description(), "first");
    }
}
