//! # Broadcaster: a multi-value event producer.
//!
//! [`Broadcaster<T>`] delivers every value passed to [`send`](Broadcaster::send)
//! to the observers registered at that moment, in registration order. It has no
//! completion and no error channel: a stream that can never fail simply has no
//! `on_error` to call.
//!
//! ## Architecture
//! ```text
//! send(v) ──► snapshot observers ──► delivery lock (reentrant) ──► [queue] ──► drain
//!                                                                             ├─► obs1(v.clone())
//!                                                                             └─► obsN(v.clone())
//! ```
//!
//! ## Rules
//! - **Order**: observers see values in `send` order.
//! - **Caller's thread**: `send` returns after its value reached every observer,
//!   delivered on the calling thread. A `send` from another thread waits for the
//!   delivery in progress to finish first.
//! - **No interleaving**: a value reaches every observer before the next value
//!   is delivered. A `send` issued from inside an observer callback is queued
//!   and delivered right after the current value, before the outer `send`
//!   returns.
//! - **No buffering**: an observer registered after `send(v)` returned never sees `v`.
//! - **Release**: a released observer receives nothing that starts after
//!   the release returned.
//! - **No unwinding**: observer panics are caught and logged.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use relaykit::Broadcaster;
//!
//! let taps = Broadcaster::<&'static str>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let s = seen.clone();
//! let sub = taps.subscribe(move |v| s.lock().unwrap().push(v));
//!
//! taps.send("tap1");
//! sub.cancel();
//! taps.send("tap2");
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["tap1"]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use super::promise::Promise;
use crate::policies::ViolationPolicy;
use crate::schedulers::{SchedulerRef, panic_message};
use crate::subscriptions::{Registration, Subscription};

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;
type Slot<T> = Arc<Registration<Callback<T>>>;

/// Values sent from inside a callback, each with the observers it is addressed to.
struct Dispatch<T> {
    queue: VecDeque<(T, Vec<Slot<T>>)>,
    draining: bool,
}

struct Shared<T> {
    observers: Mutex<Vec<Slot<T>>>,
    /// Held for a whole drain; only the draining thread can re-enter it.
    dispatch: ReentrantMutex<RefCell<Dispatch<T>>>,
    /// Source subscription of a broadcaster created by `deliver_on`.
    upstream: Mutex<Option<Subscription>>,
}

/// Multi-value event producer.
///
/// Cheap to clone: clones share the same observer set.
pub struct Broadcaster<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Broadcaster<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a broadcaster with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                observers: Mutex::new(Vec::new()),
                dispatch: ReentrantMutex::new(RefCell::new(Dispatch {
                    queue: VecDeque::new(),
                    draining: false,
                })),
                upstream: Mutex::new(None),
            }),
        }
    }

    /// Registers an observer; releasing the returned handle removes it.
    pub fn subscribe<F>(&self, on_value: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        let callback: Callback<T> = Arc::new(on_value);
        let (slot, sub) = Registration::new(callback, move |id| {
            if let Some(shared) = weak.upgrade() {
                let removed = {
                    let mut observers = shared.observers.lock();
                    observers
                        .iter()
                        .position(|s| s.id() == id)
                        .map(|pos| observers.remove(pos))
                };
                drop(removed);
            }
        });
        self.shared.observers.lock().push(slot);
        sub
    }

    /// Delivers `value` to every currently registered observer.
    pub fn send(&self, value: T) {
        let targets = self.shared.observers.lock().clone();
        self.shared.send_to(value, targets);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared.observers.lock().len()
    }

    /// True if at least one observer is registered.
    #[must_use]
    pub fn has_observers(&self) -> bool {
        self.observer_count() > 0
    }

    /// Returns a promise completing with the next value sent.
    ///
    /// The promise observes this broadcaster until that value arrives (or until
    /// the promise is cancelled), then releases its subscription.
    pub fn next_value(&self) -> Promise<T, Infallible> {
        let (promise, done) = Promise::derived(ViolationPolicy::default());
        let done = Mutex::new(Some(done));
        let sub = self.subscribe(move |v| {
            let done = done.lock().take();
            if let Some(done) = done {
                done.succeed(v);
            }
        });
        promise.hold(sub);
        promise
    }

    /// Returns a broadcaster re-sending every value of this one on `scheduler`.
    ///
    /// Observers of the returned broadcaster are invoked on that context. Each
    /// value goes to the observers registered when it was sent on this
    /// broadcaster, not when the job runs. The forwarding subscription lives as
    /// long as the returned broadcaster.
    pub fn deliver_on(&self, scheduler: &SchedulerRef) -> Broadcaster<T> {
        let down = Broadcaster::new();
        let weak = Arc::downgrade(&down.shared);
        let scheduler = Arc::clone(scheduler);

        let sub = self.subscribe(move |v| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            // Addressed to the observers present at the source send.
            let targets = shared.observers.lock().clone();
            if targets.is_empty() {
                return;
            }
            let weak = Arc::downgrade(&shared);
            drop(shared);
            scheduler.schedule(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.send_to(v, targets);
                }
            }));
        });
        *down.shared.upstream.lock() = Some(sub);
        down
    }
}

impl<T: Clone> Shared<T> {
    fn send_to(&self, value: T, targets: Vec<Slot<T>>) {
        if targets.is_empty() {
            return;
        }

        let dispatch = self.dispatch.lock();
        {
            let mut d = dispatch.borrow_mut();
            d.queue.push_back((value, targets));
            if d.draining {
                return;
            }
            d.draining = true;
        }

        let _drain = DrainGuard(&*dispatch);
        loop {
            let next = dispatch.borrow_mut().queue.pop_front();
            match next {
                Some((value, targets)) => deliver(value, targets),
                None => return,
            }
        }
    }
}

/// Ends a drain, even when it unwinds.
struct DrainGuard<'a, T>(&'a RefCell<Dispatch<T>>);

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        let leftover = {
            let mut d = self.0.borrow_mut();
            d.draining = false;
            std::mem::take(&mut d.queue)
        };
        drop(leftover);
    }
}

fn deliver<T: Clone>(value: T, targets: Vec<Slot<T>>) {
    for slot in targets {
        let Some(callback) = slot.current() else {
            continue;
        };
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(value.clone()))) {
            tracing::error!(
                panic = %panic_message(panic.as_ref()),
                subscription = slot.id().get(),
                "broadcaster observer panicked"
            );
        }
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // Release callbacks now: they may own completers waiting for a value.
        let observers = std::mem::take(self.observers.get_mut());
        for slot in observers {
            drop(slot.take());
        }
    }
}

impl<T> Default for Broadcaster<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("observers", &self.shared.observers.lock().len())
            .finish()
    }
}
