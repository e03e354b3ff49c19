//! Data subscribers for PTY output.
//!
//! Subscriptions are explicit: dropping a [`Subscription`] does not
//! unsubscribe, only [`Subscription::dispose`] does.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Box<dyn FnMut(&[u8])>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Deliver one chunk to every subscriber in registration order.
    pub(crate) fn dispatch(&mut self, chunk: &[u8]) {
        for (_, callback) in self.entries.iter_mut() {
            callback(chunk);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by `PtyProxy::on_data`.
#[must_use = "a subscription stays active until dispose() is called"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Subscribers>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Rc<RefCell<Subscribers>>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
        }
    }

    /// Stop receiving data. Returns false if the proxy is already gone.
    pub fn dispose(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.borrow_mut().remove(self.id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_subscribers_in_order_until_disposed() {
        let registry = Rc::new(RefCell::new(Subscribers::default()));
        let log = Rc::new(RefCell::new(Vec::new()));

        let first_log = Rc::clone(&log);
        let first = registry.borrow_mut().add(Box::new(move |chunk: &[u8]| {
            first_log.borrow_mut().push(format!("a:{}", chunk.len()))
        }));
        let second_log = Rc::clone(&log);
        let second = registry.borrow_mut().add(Box::new(move |chunk: &[u8]| {
            second_log.borrow_mut().push(format!("b:{}", chunk.len()))
        }));
        let first = Subscription::new(first, &registry);
        let _second = Subscription::new(second, &registry);

        registry.borrow_mut().dispatch(b"abc");
        assert!(first.dispose());
        registry.borrow_mut().dispatch(b"de");

        assert_eq!(*log.borrow(), vec!["a:3", "b:3", "b:2"]);
        assert_eq!(registry.borrow().len(), 1);
    }

    #[test]
    fn dispose_after_registry_dropped_is_harmless() {
        let registry = Rc::new(RefCell::new(Subscribers::default()));
        let id = registry.borrow_mut().add(Box::new(|_: &[u8]| {}));
        let subscription = Subscription::new(id, &registry);
        drop(registry);
        assert!(!subscription.dispose());
    }
}
