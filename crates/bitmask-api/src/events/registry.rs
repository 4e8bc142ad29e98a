//! # Handler Registry
//!
//! Maps each event name to exactly one handler. Registering a name again
//! replaces the previous handler; unregistering removes the mapping.
//!
//! ## Delivery guarantee
//!
//! A handler is never invoked after its removal (unregister or replacement)
//! has returned. Each registration owns a slot guarded by a re-entrant lock:
//! an invocation holds the lock while it runs, and removal takes the same
//! lock to retire the slot. Removal from another thread therefore waits for
//! an in-flight invocation to finish, while a handler that unregisters itself
//! re-enters the lock immediately and completes its current invocation.
//!
//! Handlers run on the poller task and should return quickly.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::debug;

use crate::domain::Event;

/// Callback invoked for every delivered event of a registered name.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle(&self, event: &Event) {
        self(event)
    }
}

struct HandlerSlot {
    /// `None` for stream-only subscriptions.
    handler: Option<Arc<dyn EventHandler>>,
    live: ReentrantMutex<Cell<bool>>,
}

impl HandlerSlot {
    fn new(handler: Option<Arc<dyn EventHandler>>) -> Self {
        Self {
            handler,
            live: ReentrantMutex::new(Cell::new(true)),
        }
    }

    /// Runs the handler unless the slot was retired. Returns whether the
    /// event was delivered.
    fn invoke(&self, event: &Event) -> bool {
        let live = self.live.lock();
        if !live.get() {
            return false;
        }
        if let Some(handler) = &self.handler {
            handler.handle(event);
        }
        true
    }

    fn retire(&self) {
        self.live.lock().set(false);
    }
}

/// Session-owned registry of event handlers.
///
/// Clones share the same registrations.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    slots: Arc<RwLock<HashMap<String, Arc<HandlerSlot>>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `name`, replacing any previous binding.
    pub fn register<H>(&self, name: impl Into<String>, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.install(name.into(), Some(Arc::new(handler)));
    }

    /// Accept events named `name` without a callback.
    ///
    /// Accepted events still reach the session's event stream.
    pub fn subscribe(&self, name: impl Into<String>) {
        self.install(name.into(), None);
    }

    /// Remove the binding for `name`. Returns whether one existed.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.slots.write().remove(name);
        match removed {
            Some(slot) => {
                slot.retire();
                debug!(event = name, "Event handler unregistered");
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.slots.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Deliver `event` to its handler.
    ///
    /// Returns `false` when no live registration exists for the name; the
    /// event is then dropped.
    pub fn dispatch(&self, event: &Event) -> bool {
        let slot = self.slots.read().get(&event.name).cloned();
        match slot {
            Some(slot) => slot.invoke(event),
            None => false,
        }
    }

    fn install(&self, name: String, handler: Option<Arc<dyn EventHandler>>) {
        let slot = Arc::new(HandlerSlot::new(handler));
        let previous = self.slots.write().insert(name.clone(), slot);
        if let Some(previous) = previous {
            previous.retire();
            debug!(event = %name, "Event handler replaced");
        } else {
            debug!(event = %name, "Event handler registered");
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("events", &self.names())
            .finish()
    }
}
