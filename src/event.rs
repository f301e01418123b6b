//! # Event Module
//!
//! A typed publish/subscribe registry. Handlers subscribe to one event kind
//! and receive every published event of that kind as a plain closure call;
//! there is no runtime scanning of handler methods.

use std::collections::HashMap;

use log::trace;

use crate::entity::EntityId;

/// Events emitted by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialEvent {
    /// Two colliders overlapped during a physics tick. The pair is ordered
    /// by entity id and published once per tick per pair.
    Collision { a: EntityId, b: EntityId },
    /// An entity was added to the scene.
    EntityAdded(EntityId),
    /// An entity was removed from the scene.
    EntityRemoved(EntityId),
}

/// Discriminant used to key handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Collision,
    EntityAdded,
    EntityRemoved,
}

impl SpatialEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SpatialEvent::Collision { .. } => EventKind::Collision,
            SpatialEvent::EntityAdded(_) => EventKind::EntityAdded,
            SpatialEvent::EntityRemoved(_) => EventKind::EntityRemoved,
        }
    }
}

type Handler = Box<dyn FnMut(&SpatialEvent) + Send>;

/// Dispatches [`SpatialEvent`]s to handlers registered per [`EventKind`].
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one event kind.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&SpatialEvent) + Send + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Delivers an event to every handler registered for its kind, in
    /// registration order.
    pub fn publish(&mut self, event: SpatialEvent) {
        trace!("event: {:?}", event);
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers {
                handler(&event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(EventKind, usize)> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.len()))
            .collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn handlers_only_see_their_kind() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::EntityAdded, move |event| {
            sink.lock().unwrap().push(*event);
        });

        let id = EntityId::new();
        bus.publish(SpatialEvent::EntityAdded(id));
        bus.publish(SpatialEvent::EntityRemoved(id));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[SpatialEvent::EntityAdded(id)]);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for label in ["first", "second"] {
            let sink = order.clone();
            bus.subscribe(EventKind::Collision, move |_| {
                sink.lock().unwrap().push(label);
            });
        }
        let id = EntityId::new();
        bus.publish(SpatialEvent::Collision { a: id, b: id });
        assert_eq!(order.lock().unwrap().as_slice(), &["first", "second"]);
    }
}
