#![forbid(unsafe_code)]

//! Synchronous event delivery for list state changes.
//!
//! A minimal single-threaded observer list: listeners are invoked on the
//! caller's stack, in registration order, with no acknowledgement and no
//! retry. [`EventBus::subscribe`] returns a [`Subscription`] guard that
//! detaches the listener when dropped; call [`Subscription::forget`] to
//! keep the listener for the bus's lifetime.
//!
//! Emitting from inside a listener is allowed (delivery only takes shared
//! borrows). Subscribing or dropping a subscription from inside a
//! listener is not supported.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<E> = Box<dyn Fn(&E)>;

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
}

/// A synchronous, single-threaded publish/subscribe channel.
pub struct EventBus<E> {
    inner: Rc<RefCell<Listeners<E>>>,
}

impl<E> EventBus<E> {
    /// Create a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener. Dropping the returned guard detaches it.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription<E> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Box::new(callback)));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
            active: true,
        }
    }

    /// Deliver `event` to every listener, in registration order.
    pub fn emit(&self, event: &E) {
        let inner = self.inner.borrow();
        for (_, callback) in &inner.entries {
            callback(event);
        }
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// RAII handle for a registered listener.
#[must_use = "dropping a subscription detaches its listener"]
pub struct Subscription<E> {
    bus: Weak<RefCell<Listeners<E>>>,
    id: u64,
    active: bool,
}

impl<E> Subscription<E> {
    /// Keep the listener attached for the rest of the bus's lifetime.
    pub fn forget(mut self) {
        self.active = false;
    }

    /// Whether this handle still controls an attached listener.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active && self.bus.strong_count() > 0
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if self.active
            && let Some(inner) = self.bus.upgrade()
        {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_registration_order() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |e| seen.borrow_mut().push(("first", *e)))
        };
        let second = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |e| seen.borrow_mut().push(("second", *e)))
        };

        bus.emit(&7);
        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
        drop(first);
        drop(second);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let bus: EventBus<u32> = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let sub = {
            let count = Rc::clone(&count);
            bus.subscribe(move |_| *count.borrow_mut() += 1)
        };
        assert!(sub.is_active());
        bus.emit(&1);
        drop(sub);
        bus.emit(&2);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn forgotten_subscription_keeps_listening() {
        let bus: EventBus<u32> = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        {
            let count = Rc::clone(&count);
            bus.subscribe(move |_| *count.borrow_mut() += 1).forget();
        }
        bus.emit(&1);
        bus.emit(&2);

        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn reentrant_emit_from_listener() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let nested = bus.clone();
        let sub = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |e| {
                seen.borrow_mut().push(*e);
                if *e == 1 {
                    nested.emit(&2);
                }
            })
        };

        bus.emit(&1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        drop(sub);
    }

    #[test]
    fn drop_after_bus_is_harmless() {
        let bus: EventBus<u32> = EventBus::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        drop(sub);
    }
}
