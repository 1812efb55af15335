//! Event Bus
//!
//! Observer registry keyed by event type. Publishing invokes every callback
//! registered for the type; a panicking callback is logged and the rest
//! still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::models::LiveEvent;

/// Subscriber callback.
pub type Callback = Arc<dyn Fn(&LiveEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<String, Vec<(u64, Callback)>>,
}

// == Event Bus ==
/// Cloneable handle to a shared subscriber registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `event_type`.
    ///
    /// The returned handle removes exactly this registration; dropping it
    /// leaves the callback subscribed.
    pub fn subscribe<F>(&self, event_type: &str, callback: F) -> Subscription
    where
        F: Fn(&LiveEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry
            .subscribers
            .entry(event_type.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        debug!("Subscriber {} registered for {}", id, event_type);

        Subscription {
            registry: Arc::downgrade(&self.registry),
            event_type: event_type.to_string(),
            id,
        }
    }

    /// Removes subscription `id` from `event_type`. Returns false if it was
    /// not registered.
    pub fn unsubscribe(&self, event_type: &str, id: u64) -> bool {
        remove(&self.registry, event_type, id)
    }

    // == Publish ==
    /// Delivers `event` to every `event_type` subscriber.
    ///
    /// Callbacks run outside the registry lock, so they may subscribe or
    /// unsubscribe. Returns the number of callbacks that completed.
    pub fn publish(&self, event_type: &str, event: &LiveEvent) -> usize {
        let callbacks: Vec<Callback> = match self.registry.lock().subscribers.get(event_type) {
            Some(subs) => subs.iter().map(|(_, cb)| cb.clone()).collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for callback in callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(()) => delivered += 1,
                Err(_) => error!("Error in subscriber callback for {}", event_type),
            }
        }
        delivered
    }

    /// Publishes `event` under its own event type.
    pub fn emit(&self, event: &LiveEvent) -> usize {
        self.publish(event.event_type(), event)
    }

    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.registry
            .lock()
            .subscribers
            .get(event_type)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        let counts: HashMap<&str, usize> = registry
            .subscribers
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventBus").field("subscribers", &counts).finish()
    }
}

fn remove(registry: &Mutex<Registry>, event_type: &str, id: u64) -> bool {
    let mut registry = registry.lock();
    let Some(subs) = registry.subscribers.get_mut(event_type) else {
        return false;
    };
    let before = subs.len();
    subs.retain(|(sub_id, _)| *sub_id != id);
    let removed = subs.len() < before;
    if subs.is_empty() {
        registry.subscribers.remove(event_type);
    }
    removed
}

// == Subscription ==
/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    event_type: String,
    id: u64,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Removes the callback. Returns false if the bus is gone or the
    /// callback was already removed.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => remove(&registry, &self.event_type, self.id),
            None => false,
        }
    }
}
