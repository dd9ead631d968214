//! Synchronous publish/subscribe event bus
//!
//! The bus is an explicit handle owned by the scene state and cloned into
//! whoever wants to observe it (renderer sync, outliner, tests). Delivery is
//! immediate: every subscriber of a channel runs, in subscription order,
//! before `publish` returns. Nothing is queued.
//!
//! Handlers may publish, subscribe or unsubscribe while a dispatch is in
//! progress. A dispatch always walks the subscriber list as it was when
//! `publish` was called, so such changes take effect from the next dispatch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use shared::ObjectId;

use crate::state::EditorMode;

/// Named notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    ObjectAdded,
    ObjectRemoved,
    ObjectSelected,
    ObjectChanged,
    MaterialChanged,
    LightChanged,
    SceneEnvironmentChanged,
    SceneGraphChanged,
    HistoryChanged,
    ModeChanged,
    WindowResize,
    /// Debug-only channel for silently tolerated failures
    Diagnostic,
}

/// Failures the core tolerates without changing state, surfaced for observers
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An action or selection referenced an object that is gone
    LookupMissed {
        object_id: ObjectId,
        operation: &'static str,
    },
    /// Autosave could not write the scene store
    PersistFailed(String),
}

/// Payload published on the bus
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ObjectAdded(ObjectId),
    ObjectRemoved(ObjectId),
    ObjectSelected(Option<ObjectId>),
    ObjectChanged(ObjectId),
    MaterialChanged(ObjectId),
    LightChanged(ObjectId),
    SceneEnvironmentChanged,
    SceneGraphChanged,
    HistoryChanged,
    ModeChanged(EditorMode),
    WindowResize { width: u32, height: u32 },
    Diagnostic(Diagnostic),
}

impl EditorEvent {
    /// Channel this event is delivered on
    pub fn channel(&self) -> Channel {
        match self {
            EditorEvent::ObjectAdded(_) => Channel::ObjectAdded,
            EditorEvent::ObjectRemoved(_) => Channel::ObjectRemoved,
            EditorEvent::ObjectSelected(_) => Channel::ObjectSelected,
            EditorEvent::ObjectChanged(_) => Channel::ObjectChanged,
            EditorEvent::MaterialChanged(_) => Channel::MaterialChanged,
            EditorEvent::LightChanged(_) => Channel::LightChanged,
            EditorEvent::SceneEnvironmentChanged => Channel::SceneEnvironmentChanged,
            EditorEvent::SceneGraphChanged => Channel::SceneGraphChanged,
            EditorEvent::HistoryChanged => Channel::HistoryChanged,
            EditorEvent::ModeChanged(_) => Channel::ModeChanged,
            EditorEvent::WindowResize { .. } => Channel::WindowResize,
            EditorEvent::Diagnostic(_) => Channel::Diagnostic,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&EditorEvent)>;

struct Subscriber {
    id: SubscriptionId,
    /// `None` listens on every channel
    channel: Option<Channel>,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
}

/// Cheaply cloneable bus handle; clones share subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler on one channel
    pub fn subscribe(
        &self,
        channel: Channel,
        handler: impl Fn(&EditorEvent) + 'static,
    ) -> SubscriptionId {
        self.register(Some(channel), Rc::new(handler))
    }

    /// Register a handler on every channel
    pub fn subscribe_all(&self, handler: impl Fn(&EditorEvent) + 'static) -> SubscriptionId {
        self.register(None, Rc::new(handler))
    }

    fn register(&self, channel: Option<Channel>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            channel,
            handler,
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Deliver an event to every current subscriber of its channel
    pub fn publish(&self, event: EditorEvent) {
        let channel = event.channel();
        // Release the borrow before calling out so handlers can re-enter.
        let handlers: Vec<Handler> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.channel.map_or(true, |c| c == channel))
            .map(|s| Rc::clone(&s.handler))
            .collect();

        tracing::trace!(?event, subscribers = handlers.len(), "publish");
        for handler in handlers {
            handler(&event);
        }
    }

    /// Number of subscribers that would receive an event on `channel`
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.channel.map_or(true, |c| c == channel))
            .count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(bus: &EventBus, channel: Channel) -> Rc<RefCell<Vec<EditorEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        bus.subscribe(channel, move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn test_delivers_only_on_channel() {
        let bus = EventBus::new();
        let added = recorder(&bus, Channel::ObjectAdded);
        bus.publish(EditorEvent::ObjectAdded(1));
        bus.publish(EditorEvent::ObjectRemoved(1));
        assert_eq!(*added.borrow(), vec![EditorEvent::ObjectAdded(1)]);
    }

    #[test]
    fn test_subscription_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.subscribe(Channel::HistoryChanged, move |_| order.borrow_mut().push(tag));
        }
        bus.publish(EditorEvent::HistoryChanged);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_subscribe_all() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        bus.subscribe_all(move |_| counter.set(counter.get() + 1));
        bus.publish(EditorEvent::SceneGraphChanged);
        bus.publish(EditorEvent::ObjectSelected(None));
        assert_eq!(seen.get(), 2);
        assert_eq!(bus.subscriber_count(Channel::WindowResize), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let id = bus.subscribe(Channel::ObjectChanged, move |_| counter.set(counter.get() + 1));
        bus.publish(EditorEvent::ObjectChanged(4));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(EditorEvent::ObjectChanged(4));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_keeps_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        {
            let bus_handle = bus.clone();
            let slot = Rc::clone(&own_id);
            let order = Rc::clone(&order);
            let id = bus.subscribe(Channel::ObjectChanged, move |_| {
                order.borrow_mut().push("once");
                if let Some(id) = slot.get() {
                    bus_handle.unsubscribe(id);
                }
            });
            own_id.set(Some(id));
        }
        {
            let order = Rc::clone(&order);
            bus.subscribe(Channel::ObjectChanged, move |_| order.borrow_mut().push("always"));
        }

        bus.publish(EditorEvent::ObjectChanged(1));
        bus.publish(EditorEvent::ObjectChanged(1));
        assert_eq!(*order.borrow(), vec!["once", "always", "always"]);
    }

    #[test]
    fn test_reentrant_publish_is_synchronous() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let bus_handle = bus.clone();
            let order = Rc::clone(&order);
            bus.subscribe(Channel::ObjectChanged, move |_| {
                order.borrow_mut().push("changed");
                bus_handle.publish(EditorEvent::HistoryChanged);
                order.borrow_mut().push("changed-done");
            });
        }
        {
            let order = Rc::clone(&order);
            bus.subscribe(Channel::HistoryChanged, move |_| order.borrow_mut().push("history"));
        }
        bus.publish(EditorEvent::ObjectChanged(2));
        assert_eq!(*order.borrow(), vec!["changed", "history", "changed-done"]);
    }
}
