//! Per-observer registration slot shared between a producer and a [`Subscription`].
//!
//! The producer keeps an `Arc<Registration<C>>` in its observer list and reads
//! the callback out of it right before each delivery; the subscription clears it.
//! Callbacks are never invoked while the slot's lock is held, so an observer
//! may cancel itself from inside its own callback.

use std::sync::Arc;

use parking_lot::Mutex;

use super::subscription::{Release, Subscription, SubscriptionId};

type Detach = Box<dyn Fn(SubscriptionId) + Send + Sync>;

pub(crate) struct Registration<C> {
    id: SubscriptionId,
    callback: Mutex<Option<C>>,
    detach: Detach,
}

impl<C: Send + 'static> Registration<C> {
    /// Creates a registration and the subscription handle that controls it.
    ///
    /// `detach` is called once, on release, to drop the registration from the
    /// producer's observer list.
    pub(crate) fn new<D>(callback: C, detach: D) -> (Arc<Self>, Subscription)
    where
        D: Fn(SubscriptionId) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        let reg = Arc::new(Self {
            id,
            callback: Mutex::new(Some(callback)),
            detach: Box::new(detach),
        });
        let sub = Subscription::attached(id, reg.clone());
        (reg, sub)
    }
}

impl<C> Registration<C> {
    #[inline]
    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Takes the callback out for a one-shot delivery.
    pub(crate) fn take(&self) -> Option<C> {
        self.callback.lock().take()
    }

    /// Inspects the callback without taking it; `None` once released.
    pub(crate) fn peek<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        self.callback.lock().as_ref().map(f)
    }
}

impl<C: Clone> Registration<C> {
    /// Returns a copy of the callback for a repeated delivery.
    pub(crate) fn current(&self) -> Option<C> {
        self.callback.lock().clone()
    }
}

impl<C: Send + 'static> Release for Registration<C> {
    fn release(&self) {
        let callback = self.callback.lock().take();
        drop(callback);
        (self.detach)(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn release_clears_callback_and_detaches() {
        let detached = Arc::new(AtomicU64::new(0));
        let d = detached.clone();
        let (reg, sub) = Registration::new(42u32, move |id: SubscriptionId| {
            d.store(id.get(), Ordering::SeqCst);
        });

        assert_eq!(reg.current(), Some(42));
        sub.cancel();

        assert_eq!(reg.peek(|_| ()), None);
        assert_eq!(reg.current(), None);
        assert_eq!(detached.load(Ordering::SeqCst), reg.id().get());
    }

    #[test]
    fn take_empties_slot() {
        let (reg, _sub) = Registration::new(String::from("once"), |_| {});
        assert_eq!(reg.take().as_deref(), Some("once"));
        assert_eq!(reg.take(), None);
    }
}
