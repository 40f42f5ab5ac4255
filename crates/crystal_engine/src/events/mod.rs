//! Callback registration with scoped release
//!
//! Per-frame callbacks and scroll observers are both registered through a
//! [`CallbackRegistry`]. Registering hands back a [`Subscription`]; the
//! callback stays installed exactly as long as that handle is alive and has
//! not been released.
//!
//! Key properties:
//! - Releasing is idempotent and also happens on `Drop`
//! - A callback released during a dispatch is not invoked later in that dispatch
//! - A callback registered during a dispatch first runs on the next dispatch
//! - A handle outliving its registry releases as a no-op

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{DefaultKey, SlotMap};

type Callback<A> = Rc<RefCell<Box<dyn FnMut(&A)>>>;

/// Registry side of a subscription, erased over the argument type
trait CallbackSlots {
    fn remove(&self, key: DefaultKey) -> bool;
    fn contains(&self, key: DefaultKey) -> bool;
}

impl<A: ?Sized> CallbackSlots for RefCell<SlotMap<DefaultKey, Callback<A>>> {
    fn remove(&self, key: DefaultKey) -> bool {
        // The removed callback may own subscriptions into this registry, so it
        // must be dropped after the borrow ends
        let removed = self.borrow_mut().remove(key);
        removed.is_some()
    }

    fn contains(&self, key: DefaultKey) -> bool {
        self.borrow().contains_key(key)
    }
}

/// Ordered set of callbacks invoked with a shared argument
pub struct CallbackRegistry<A: ?Sized + 'static> {
    slots: Rc<RefCell<SlotMap<DefaultKey, Callback<A>>>>,
}

impl<A: ?Sized + 'static> Default for CallbackRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static> CallbackRegistry<A> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(SlotMap::new())),
        }
    }

    /// Install a callback until the returned subscription is released
    #[must_use = "dropping the subscription unregisters the callback immediately"]
    pub fn register<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&A) + 'static,
    {
        let boxed: Box<dyn FnMut(&A)> = Box::new(callback);
        let key = self.slots.borrow_mut().insert(Rc::new(RefCell::new(boxed)));

        let slots: Rc<dyn CallbackSlots> = self.slots.clone();
        log::trace!("Registered callback {:?}", key);
        Subscription {
            slot: Some((Rc::downgrade(&slots), key)),
        }
    }

    /// Invoke every installed callback once, returning how many ran
    pub fn dispatch(&self, arg: &A) -> usize {
        // Snapshot so callbacks may register or release while we iterate
        let snapshot: Vec<(DefaultKey, Callback<A>)> = self
            .slots
            .borrow()
            .iter()
            .map(|(key, callback)| (key, Rc::clone(callback)))
            .collect();

        let mut invoked = 0;
        for (key, callback) in snapshot {
            if !self.slots.borrow().contains_key(key) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => {
                    (&mut **callback)(arg);
                    invoked += 1;
                }
                Err(_) => log::warn!("Skipping re-entrant dispatch into callback {:?}", key),
            };
        }
        invoked
    }

    /// Number of installed callbacks
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Whether no callbacks are installed
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

/// Scoped registration handle
///
/// Holds a callback in its registry until [`release`](Self::release) is called
/// or the handle is dropped.
pub struct Subscription {
    slot: Option<(Weak<dyn CallbackSlots>, DefaultKey)>,
}

impl Subscription {
    /// Remove the callback from its registry
    ///
    /// Safe to call any number of times, and after the registry is gone.
    pub fn release(&mut self) {
        if let Some((slots, key)) = self.slot.take() {
            match slots.upgrade() {
                Some(slots) => {
                    if slots.remove(key) {
                        log::trace!("Released callback {:?}", key);
                    }
                }
                None => log::trace!("Registry already dropped for callback {:?}", key),
            }
        }
    }

    /// Whether the callback is still installed
    pub fn is_active(&self) -> bool {
        self.slot
            .as_ref()
            .and_then(|(slots, key)| slots.upgrade().map(|slots| slots.contains(*key)))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
