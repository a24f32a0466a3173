//! # SubscriptionBag: batch release of a consumer's subscriptions.
//!
//! A consumer collects the [`Subscription`]s it creates in one bag and releases
//! them together, either with [`SubscriptionBag::cancel_all`] or by dropping the
//! bag at the end of its own lifetime.
//!
//! ## Rules
//! - Each stored subscription is released **exactly once**.
//! - The bag is owned by a single consumer; it is mutated through `&mut self`
//!   and carries no internal synchronization.
//!
//! ## Example
//! ```rust
//! use relaykit::{Broadcaster, SubscriptionBag};
//!
//! let taps = Broadcaster::<String>::new();
//! let mut bag = SubscriptionBag::new();
//!
//! taps.subscribe(|s| println!("tapped: {s}")).store_in(&mut bag);
//! assert_eq!(taps.observer_count(), 1);
//!
//! bag.cancel_all();
//! assert_eq!(taps.observer_count(), 0);
//! ```

use super::Subscription;

/// Owned collection of subscriptions released together.
#[derive(Debug, Default)]
pub struct SubscriptionBag {
    items: Vec<Subscription>,
}

impl SubscriptionBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a subscription to the bag.
    pub fn insert(&mut self, sub: Subscription) {
        self.items.push(sub);
    }

    /// Releases every subscription in the bag and empties it.
    ///
    /// Returns how many of them were still active.
    pub fn cancel_all(&mut self) -> usize {
        let mut active = 0;
        for sub in self.items.drain(..) {
            if sub.is_active() {
                active += 1;
            }
            sub.cancel();
        }
        active
    }

    /// Number of stored subscriptions (active or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the bag holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of stored subscriptions that are still active.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.items.iter().filter(|s| s.is_active()).count()
    }
}

impl Extend<Subscription> for SubscriptionBag {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Broadcaster;

    #[test]
    fn cancel_all_releases_everything() {
        let b = Broadcaster::<u32>::new();
        let mut bag = SubscriptionBag::new();
        b.subscribe(|_| {}).store_in(&mut bag);
        b.subscribe(|_| {}).store_in(&mut bag);
        assert_eq!(b.observer_count(), 2);

        assert_eq!(bag.cancel_all(), 2);
        assert!(bag.is_empty());
        assert_eq!(b.observer_count(), 0);
    }

    #[test]
    fn drop_releases_everything() {
        let b = Broadcaster::<u32>::new();
        {
            let mut bag = SubscriptionBag::new();
            bag.extend([b.subscribe(|_| {}), b.subscribe(|_| {})]);
            assert_eq!(bag.len(), 2);
        }
        assert_eq!(b.observer_count(), 0);
    }

    #[test]
    fn counts_only_active() {
        let b = Broadcaster::<u32>::new();
        let mut bag = SubscriptionBag::new();
        let sub = b.subscribe(|_| {});
        sub.cancel();
        bag.insert(sub);
        b.subscribe(|_| {}).store_in(&mut bag);

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.active_len(), 1);
        assert_eq!(bag.cancel_all(), 1);
    }
}
