//! Event bus - typed publish/subscribe with cooperative cancellation
//!
//! Listeners for an event kind run synchronously, in registration order,
//! within the caller's publish. The bus never short-circuits: a cancelled
//! event and a failing listener both leave the remaining listeners running,
//! so one malfunctioning listener cannot starve moderation-relevant ones.
//! Callers are expected to serialize publishes per bot instance; the bus
//! itself holds no locks.

use std::collections::HashMap;

use tracing::error;

use modbot_core::{EventKind, ModEvent};

/// A bus listener
///
/// Failures are isolated per listener: the bus logs them and continues.
pub type Listener = Box<dyn Fn(&mut ModEvent) -> anyhow::Result<()> + Send + Sync>;

/// Typed publish/subscribe bus for moderation events
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the ordered subscriber list for an event kind
    ///
    /// Registration order is invocation order and is never reordered.
    pub fn subscribe(&mut self, kind: EventKind, listener: Listener) {
        self.subscribers.entry(kind).or_default().push(listener);
    }

    /// Number of listeners registered for an event kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Publish an event to every listener of its kind, in registration order
    ///
    /// Cancellation set by one listener is visible to the next via
    /// [`ModEvent::is_cancelled`] but does not stop delivery; consumers that
    /// care check the flag at entry. Returns the number of listeners
    /// invoked.
    pub fn publish(&self, event: &mut ModEvent) -> usize {
        let Some(listeners) = self.subscribers.get(&event.kind()) else {
            return 0;
        };

        for listener in listeners {
            if let Err(err) = listener(event) {
                error!(
                    event = event.event_type(),
                    error = %err,
                    "event listener failed, continuing with remaining listeners"
                );
            }
        }

        listeners.len()
    }
}
