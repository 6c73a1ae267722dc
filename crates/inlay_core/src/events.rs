//! Event types and dispatch
//!
//! Events are identified by `u32` constants so they can double as state
//! machine inputs. The dispatcher routes events to handlers registered per
//! (target, event type) pair; targets are raw widget ids.

use rustc_hash::FxHashMap;
use serde_json::Value;

/// Event type constants
pub mod event_types {
    /// Pointer click on a bound element
    pub const CLICK: u32 = 0;
    /// Focus entering a bound element
    pub const FOCUS: u32 = 1;
    /// Focus leaving a bound element
    pub const BLUR: u32 = 2;
    /// The configured edit-trigger interaction, normalized
    pub const TRIGGER: u32 = 3;
    /// Raised before a trigger interaction is processed
    pub const BEFORE_TRIGGER: u32 = 4;
    /// Raised after a trigger interaction has been processed
    pub const AFTER_TRIGGER: u32 = 5;
    /// The input factory delivered the editing control
    pub const INPUT_READY: u32 = 6;
    /// Confirm affordance pressed
    pub const CONFIRM: u32 = 7;
    /// Cancel affordance pressed, or forced deactivation
    pub const CANCEL: u32 = 8;
    /// Update delegate reported a committed value
    pub const SUCCESS: u32 = 9;
    /// Update delegate reported validation errors
    pub const ERROR: u32 = 10;
    /// Instance teardown
    pub const DESTROY: u32 = 11;
}

/// Map a declarative trigger name to its event type.
///
/// Returns `None` for names with no interaction mapping.
pub fn trigger_from_name(name: &str) -> Option<u32> {
    match name {
        "click" => Some(event_types::CLICK),
        "focus" => Some(event_types::FOCUS),
        "blur" => Some(event_types::BLUR),
        _ => None,
    }
}

/// Payload carried by an event
#[derive(Debug, Clone, Default)]
pub enum EventData {
    /// No payload
    #[default]
    None,
    /// The originating interaction for trigger notifications
    Interaction {
        /// Event type of the interaction that opened the editor
        trigger: u32,
    },
    /// Success notification: the confirmed value plus an optional external
    /// model payload supplied by the update delegate
    Success {
        value: Value,
        model: Option<Value>,
    },
    /// Error notification: ordered validation messages
    Errors { errors: Vec<String> },
}

/// An event addressed to a widget instance
#[derive(Debug, Clone)]
pub struct Event {
    /// One of the [`event_types`] constants
    pub event_type: u32,
    /// Raw id of the target instance
    pub target: u64,
    /// Payload
    pub data: EventData,
}

impl Event {
    /// Create an event with no payload
    pub fn new(event_type: u32, target: u64) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
        }
    }

    /// Create an event carrying a payload
    pub fn with_data(event_type: u32, target: u64, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
        }
    }
}

type Handler = Box<dyn Fn(&Event) + Send + Sync>;

/// Dispatches events to handlers registered per (target, event type)
#[derive(Default)]
pub struct EventDispatcher {
    handlers: FxHashMap<(u64, u32), Vec<Handler>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a (target, event type) pair
    pub fn register<F>(&mut self, target: u64, event_type: u32, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.handlers
            .entry((target, event_type))
            .or_default()
            .push(Box::new(handler));
    }

    /// Remove every handler for a (target, event type) pair
    pub fn unregister(&mut self, target: u64, event_type: u32) {
        self.handlers.remove(&(target, event_type));
    }

    /// Remove every handler bound to a target, regardless of event type
    pub fn unregister_target(&mut self, target: u64) {
        self.handlers.retain(|&(t, _), _| t != target);
    }

    /// Dispatch an event to all matching handlers, in registration order
    pub fn dispatch(&self, event: &Event) {
        if let Some(handlers) = self.handlers.get(&(event.target, event.event_type)) {
            for handler in handlers {
                handler(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_invokes_matching_handlers_in_order() {
        let mut dispatcher = EventDispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = log.clone();
        dispatcher.register(1, event_types::SUCCESS, move |_| {
            first.lock().unwrap().push("first");
        });
        let second = log.clone();
        dispatcher.register(1, event_types::SUCCESS, move |_| {
            second.lock().unwrap().push("second");
        });

        dispatcher.dispatch(&Event::new(event_types::SUCCESS, 1));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_dispatch_ignores_other_targets_and_types() {
        let mut dispatcher = EventDispatcher::new();
        let count = Arc::new(Mutex::new(0));

        let seen = count.clone();
        dispatcher.register(1, event_types::SUCCESS, move |_| {
            *seen.lock().unwrap() += 1;
        });

        dispatcher.dispatch(&Event::new(event_types::SUCCESS, 2));
        dispatcher.dispatch(&Event::new(event_types::ERROR, 1));
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_unregister_target_removes_all_bindings() {
        let mut dispatcher = EventDispatcher::new();
        let count = Arc::new(Mutex::new(0));

        for event_type in [event_types::SUCCESS, event_types::ERROR] {
            let seen = count.clone();
            dispatcher.register(7, event_type, move |_| {
                *seen.lock().unwrap() += 1;
            });
        }

        dispatcher.unregister_target(7);
        dispatcher.dispatch(&Event::new(event_types::SUCCESS, 7));
        dispatcher.dispatch(&Event::new(event_types::ERROR, 7));
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_trigger_from_name() {
        assert_eq!(trigger_from_name("click"), Some(event_types::CLICK));
        assert_eq!(trigger_from_name("focus"), Some(event_types::FOCUS));
        assert_eq!(trigger_from_name("hover"), None);
    }
}
