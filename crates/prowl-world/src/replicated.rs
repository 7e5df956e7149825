//! `Replicated<T>` — a published value with change observers.
//!
//! This is the core's view of the replication layer: the authoritative side
//! `set`s the value, every subscribed observer is notified on change, and
//! observers never call back into authoritative logic.  Transport is someone
//! else's problem; an engine binding forwards `set` onto the wire and feeds
//! received values into its own `Replicated` mirror.
//!
//! Subscribe/unsubscribe are idempotent: a handle unsubscribes exactly the
//! registration that produced it, and dropping the same handle twice is a
//! no-op.  Observer slots are kept as `Option`s so unsubscription never
//! shifts other observers' handles.

/// Identifies one subscription on a [`Replicated`] value.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SubscriberHandle(usize);

type Observer<T> = Box<dyn FnMut(T, T) + Send>;

/// A replicated value: current state plus an observer list.
///
/// `T` is `Copy + PartialEq` — replicated values are small identifiers and
/// flags, and equality gating keeps redundant `set`s from spamming observers.
pub struct Replicated<T: Copy + PartialEq> {
    value: T,
    observers: Vec<Option<Observer<T>>>,
}

impl<T: Copy + PartialEq> Replicated<T> {
    pub fn new(initial: T) -> Self {
        Self { value: initial, observers: Vec::new() }
    }

    /// The current value.
    #[inline]
    pub fn get(&self) -> T {
        self.value
    }

    /// Publish a new value.  Observers are notified as `(old, new)` only if
    /// the value actually changed.
    pub fn set(&mut self, new: T) {
        if new == self.value {
            return;
        }
        let old = self.value;
        self.value = new;
        for slot in self.observers.iter_mut() {
            if let Some(observer) = slot {
                observer(old, new);
            }
        }
    }

    /// Register a change observer; returns the handle that unsubscribes it.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberHandle
    where
        F: FnMut(T, T) + Send + 'static,
    {
        self.observers.push(Some(Box::new(observer)));
        SubscriberHandle(self.observers.len() - 1)
    }

    /// Remove a subscription.  Unknown or already-removed handles are
    /// ignored, so double-unsubscribe is safe.
    pub fn unsubscribe(&mut self, handle: SubscriberHandle) {
        if let Some(slot) = self.observers.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.observers.iter().filter(|s| s.is_some()).count()
    }
}
