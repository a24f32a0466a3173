//! # Subscription handle.
//!
//! [`Subscription`] is the opaque registration handle returned by every
//! `subscribe` call. It holds the producer only weakly (through its
//! registration), so keeping a subscription alive never keeps values flowing
//! into a producer nobody else references.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::Mutex;

use super::SubscriptionBag;

/// Global sequence counter for subscription identities.
static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identity of one observer registration.
///
/// Identifiers are unique for the lifetime of the process and increase
/// monotonically, so they also reflect registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(SUBSCRIPTION_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw identifier.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Something a subscription can release.
///
/// Implemented by [`Registration`](super::Registration); releasing clears the
/// observer callback and detaches it from its producer.
pub(crate) trait Release: Send + Sync {
    fn release(&self);
}

/// Handle for one observer's registration with a producer.
///
/// ### Properties
/// - **Idempotent**: [`cancel`](Self::cancel) may be called any number of times.
/// - **RAII**: dropping the handle cancels it.
/// - **Thread-safe**: cancel from any thread, including from inside the
///   observer's own callback.
#[must_use = "dropping a Subscription cancels it; keep it or store it in a SubscriptionBag"]
pub struct Subscription {
    id: SubscriptionId,
    target: Mutex<Option<Arc<dyn Release>>>,
}

impl Subscription {
    pub(crate) fn attached(id: SubscriptionId, target: Arc<dyn Release>) -> Self {
        Self {
            id,
            target: Mutex::new(Some(target)),
        }
    }

    /// Creates a subscription that is already released.
    ///
    /// Returned when a producer has nothing left to deliver (for example when
    /// subscribing to a promise that already completed and replayed its result).
    pub fn empty() -> Self {
        Self {
            id: SubscriptionId::next(),
            target: Mutex::new(None),
        }
    }

    /// Returns the identity of this registration.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// True until the subscription is cancelled (or was created [`empty`](Self::empty)).
    pub fn is_active(&self) -> bool {
        self.target.lock().is_some()
    }

    /// Stops delivery to this observer.
    ///
    /// Calling it again has no effect.
    pub fn cancel(&self) {
        let target = self.target.lock().take();
        if let Some(target) = target {
            target.release();
        }
    }

    /// Moves the subscription into `bag`, tying its lifetime to the bag.
    pub fn store_in(self, bag: &mut SubscriptionBag) {
        bag.insert(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter(AtomicUsize);

    impl Release for Counter {
        fn release(&self) {
            self.0.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }

    #[test]
    fn cancel_releases_once() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let sub = Subscription::attached(SubscriptionId::next(), counter.clone());

        assert!(sub.is_active());
        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());
        drop(sub);

        assert_eq!(counter.0.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn drop_releases() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        drop(Subscription::attached(SubscriptionId::next(), counter.clone()));
        assert_eq!(counter.0.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn ids_increase() {
        let a = SubscriptionId::next();
        let b = SubscriptionId::next();
        assert!(b > a);
    }

    #[test]
    fn empty_is_inactive() {
        let sub = Subscription::empty();
        assert!(!sub.is_active());
        sub.cancel();
    }
}
