//! # ActionCell: a reusable row with one action.
//!
//! The cell publishes its taps on a per-cell [`Broadcaster<String>`] instead of
//! calling back into a delegate. Whoever configures the cell binds to that
//! broadcaster through [`ActionCell::bind`]; the bindings live in the cell's own
//! [`SubscriptionBag`], so they end when the cell is reused or dropped.
//!
//! ## Rules
//! - [`prepare_for_reuse`](ActionCell::prepare_for_reuse) releases every binding
//!   and replaces the broadcaster; observers attached to the old one directly
//!   stop receiving taps as well.
//! - Configuring a cell N times leaves exactly the last configuration's
//!   bindings in place.

use crate::producers::Broadcaster;
use crate::subscriptions::{Subscription, SubscriptionBag};

/// Message sent on every tap.
pub const TAP_MESSAGE: &str = "Button is tapped!!!!!";

/// Reusable cell whose button taps are published on [`action`](Self::action).
#[derive(Debug, Default)]
pub struct ActionCell {
    action: Broadcaster<String>,
    bindings: SubscriptionBag,
    reuses: usize,
}

impl ActionCell {
    /// Creates a cell with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tap broadcaster of the current configuration.
    pub fn action(&self) -> &Broadcaster<String> {
        &self.action
    }

    /// Simulates a button tap: sends [`TAP_MESSAGE`] to the current observers.
    pub fn tap(&self) {
        self.action.send(TAP_MESSAGE.to_string());
    }

    /// Binds `on_tap` for the lifetime of the current configuration.
    pub fn bind<F>(&mut self, on_tap: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.action.subscribe(on_tap).store_in(&mut self.bindings);
    }

    /// Observes taps outside the cell's own bindings.
    ///
    /// The caller owns the returned handle; it still stops receiving taps once
    /// the cell is reused.
    pub fn observe<F>(&self, on_tap: F) -> Subscription
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.action.subscribe(on_tap)
    }

    /// Releases the current bindings and starts a fresh broadcaster.
    ///
    /// Returns how many bindings were still active.
    pub fn prepare_for_reuse(&mut self) -> usize {
        let released = self.bindings.cancel_all();
        self.action = Broadcaster::new();
        self.reuses += 1;
        tracing::debug!(released, reuses = self.reuses, "cell prepared for reuse");
        released
    }

    /// Number of observers of the current configuration.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.action.observer_count()
    }

    /// How many times the cell was prepared for reuse.
    #[must_use]
    pub fn reuse_count(&self) -> usize {
        self.reuses
    }
}
