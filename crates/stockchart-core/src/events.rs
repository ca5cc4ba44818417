// File: crates/stockchart-core/src/events.rs
// Summary: Single-threaded event hub with id-based subscriptions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SubscriptionId = u64;

type Handler<E> = Rc<dyn Fn(&E)>;

/// Handlers are snapshotted before dispatch, so a handler may subscribe or
/// unsubscribe (itself included) while an event is being delivered.
pub struct EventHub<E> {
    next_id: Cell<SubscriptionId>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<E>)>>,
}

impl<E> EventHub<E> {
    pub fn new() -> Self {
        Self { next_id: Cell::new(1), handlers: RefCell::new(Vec::new()) }
    }

    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter().position(|(hid, _)| *hid == id) {
            Some(idx) => {
                handlers.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = self.handlers.borrow().iter().map(|(_, h)| Rc::clone(h)).collect();
        for handler in snapshot {
            handler(event);
        }
    }

    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn len(&self) -> usize { self.handlers.borrow().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl<E> Default for EventHub<E> {
    fn default() -> Self { Self::new() }
}
