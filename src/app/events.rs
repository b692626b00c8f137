//! Typed observer plumbing shared by models and views.
//!
//! Every observable source owns an [`Emitter`] for its own event enum.
//! Subscribers are notified synchronously, in registration order, and get a
//! [`Subscription`] handle back that detaches them again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Receives events of type `E` from an [`Emitter`].
pub trait Subscriber<E> {
    fn notify(&self, event: &E);
}

impl<E, F> Subscriber<E> for F
where
    F: Fn(&E),
{
    fn notify(&self, event: &E) {
        self(event)
    }
}

type Slot<E> = (u64, Rc<dyn Subscriber<E>>);

struct Registry<E> {
    next_id: Cell<u64>,
    slots: RefCell<Vec<Slot<E>>>,
}

/// Removes a subscriber by id without knowing the event type.
trait Detach {
    fn detach(&self, id: u64) -> bool;
}

impl<E> Detach for Registry<E> {
    fn detach(&self, id: u64) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|(slot_id, _)| *slot_id != id);
        slots.len() != before
    }
}

impl<E> Registry<E> {
    fn is_registered(&self, id: u64) -> bool {
        self.slots.borrow().iter().any(|(slot_id, _)| *slot_id == id)
    }
}

/// Synchronous event broadcaster for a single event type.
pub struct Emitter<E> {
    registry: Rc<Registry<E>>,
}

impl<E: 'static> Emitter<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(0),
                slots: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a subscriber. It stays registered until the returned
    /// handle is disposed or the emitter is dropped.
    pub fn subscribe(&self, subscriber: impl Subscriber<E> + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry
            .slots
            .borrow_mut()
            .push((id, Rc::new(subscriber)));

        let registry: Rc<dyn Detach> = self.registry.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Notify every subscriber in registration order.
    ///
    /// Subscribers may subscribe or dispose while being notified. A
    /// subscriber disposed mid-broadcast is not called afterwards.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Slot<E>> = self
            .registry
            .slots
            .borrow()
            .iter()
            .map(|(id, subscriber)| (*id, Rc::clone(subscriber)))
            .collect();

        for (id, subscriber) in snapshot {
            if self.registry.is_registered(id) {
                subscriber.notify(event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.slots.borrow().len()
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.registry.slots.borrow().len())
            .finish()
    }
}

/// Handle for a registered subscriber.
#[must_use = "dropping a Subscription keeps the subscriber registered; call dispose() to detach"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    /// Detach the subscriber. Returns false if it was already gone.
    pub fn dispose(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.detach(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifies_in_registration_order() {
        let emitter: Emitter<u32> = Emitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        let _a = emitter.subscribe(move |n: &u32| first.borrow_mut().push(("a", *n)));
        let second = Rc::clone(&seen);
        let _b = emitter.subscribe(move |n: &u32| second.borrow_mut().push(("b", *n)));

        emitter.emit(&1);
        emitter.emit(&2);

        assert_eq!(
            *seen.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn test_dispose_detaches() {
        let emitter: Emitter<()> = Emitter::new();
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        let subscription = emitter.subscribe(move |_: &()| counter.set(counter.get() + 1));
        emitter.emit(&());
        assert!(subscription.dispose());
        emitter.emit(&());

        assert_eq!(count.get(), 1);
        assert_eq!(emitter.subscriber_count(), 0);
    }

    #[test]
    fn test_dispose_after_emitter_dropped() {
        let emitter: Emitter<()> = Emitter::new();
        let subscription = emitter.subscribe(|_: &()| {});
        drop(emitter);
        assert!(!subscription.dispose());
    }

    #[test]
    fn test_subscribe_during_emit() {
        let emitter: Rc<Emitter<u8>> = Rc::new(Emitter::new());
        let late = Rc::new(Cell::new(0));

        let inner_emitter = Rc::clone(&emitter);
        let late_counter = Rc::clone(&late);
        let _outer = emitter.subscribe(move |_: &u8| {
            let counter = Rc::clone(&late_counter);
            let _ = inner_emitter.subscribe(move |_: &u8| counter.set(counter.get() + 1));
        });

        // The subscriber added mid-broadcast only sees later events
        emitter.emit(&0);
        assert_eq!(late.get(), 0);
        emitter.emit(&0);
        assert_eq!(late.get(), 1);
    }
}
