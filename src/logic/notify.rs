//! Change Notification Plumbing
//!
//! Observer registration shared by the store, the suggestion board and the
//! analysis desk. Subscribers are invoked in registration order and never
//! after their subscription has been cancelled: removal takes the same lock
//! that `notify` holds while running callbacks.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback = Box<dyn Fn() + Send + Sync + 'static>;
type Slots = Mutex<Vec<(u64, Callback)>>;

/// Ordered set of change callbacks
#[derive(Default)]
pub struct SubscriberSet {
    slots: Arc<Slots>,
    next_id: Mutex<u64>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; the subscription unregisters on drop or `cancel`
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        self.slots.lock().push((id, Box::new(callback)));
        Subscription {
            slots: Arc::downgrade(&self.slots),
            id,
        }
    }

    /// Invoke all live callbacks in registration order
    ///
    /// Callbacks must not subscribe or cancel on the same set reentrantly.
    pub fn notify(&self) {
        let slots = self.slots.lock();
        for (_, callback) in slots.iter() {
            callback();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Handle returned by [`SubscriberSet::subscribe`]
///
/// Dropping it unregisters the callback.
pub struct Subscription {
    slots: Weak<Slots>,
    id: u64,
}

impl Subscription {
    /// Unregister now instead of waiting for drop
    pub fn cancel(self) {
        // Drop impl does the removal
    }

    fn remove(&self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
