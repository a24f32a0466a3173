//! # Promise: a single-value asynchronous producer.
//!
//! A [`Promise<T, E>`] models a computation that completes **exactly once**, with
//! either a value `T` or an error `E`. The producing side holds a [`Completer`];
//! consuming it delivers the result to every current subscriber and moves the
//! promise to a terminal state.
//!
//! ## Lifecycle
//! ```text
//!                 Completer::complete(Ok(v))   ┌──► Completed(Ok(v))  → on_value(v), on_complete()
//!   Pending ──────────────────────────────────┤
//!     │           Completer::complete(Err(e))  └──► Completed(Err(e)) → on_error(e)
//!     │
//!     ├── Promise::cancel() ─────────────────────► Cancelled  (nothing delivered)
//!     └── Completer dropped unused ──────────────► Abandoned  (nothing delivered, violation reported)
//! ```
//!
//! ## Rules
//! - **Exactly once**: [`Completer::complete`] consumes the completer, so completing
//!   twice does not compile. Dropping a completer without completing is the one
//!   contract violation left; it is reported per the promise's
//!   [`ViolationPolicy`](crate::ViolationPolicy).
//! - **Replay**: subscribing after completion delivers the cached result
//!   synchronously and returns an already-released [`Subscription`].
//! - **Delivery only**: cancelling a subscription stops delivery to that observer;
//!   it does not stop the producing work. [`Promise::cancel`] is the way to signal
//!   the work (through its [`CancellationToken`]).
//! - **No unwinding**: observer panics are caught and logged.
//! - **Unhandled errors are visible**: a failure that reaches no error handler is
//!   logged with `tracing::warn!`.
//!
//! ## Example
//! ```rust
//! use relaykit::Promise;
//!
//! let p = Promise::<u32, String>::create(|done| done.succeed(7));
//! let _sub = p.subscribe(
//!     |v| assert_eq!(v, 7),
//!     |e| panic!("unexpected error: {e}"),
//!     || println!("finished"),
//! );
//! ```

use std::fmt::{self, Debug};
use std::future::{Future, IntoFuture};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::{AwaitError, ContractViolation};
use crate::policies::ViolationPolicy;
use crate::schedulers::{Scheduler, panic_message};
use crate::subscriptions::{Registration, Subscription, SubscriptionId};

type Delivery<T, E> = Box<dyn FnOnce(Result<T, E>) + Send + 'static>;

/// One registered observer of a promise.
struct Observer<T, E> {
    deliver: Delivery<T, E>,
    handles_errors: bool,
}

type Slot<T, E> = Arc<Registration<Observer<T, E>>>;

enum State<T, E> {
    Pending(Vec<Slot<T, E>>),
    Completed(Result<T, E>),
    Cancelled,
    Abandoned,
}

pub(crate) struct Inner<T, E> {
    state: Mutex<State<T, E>>,
    token: CancellationToken,
    policy: ViolationPolicy,
    /// Subscriptions this promise depends on; released once it is terminal.
    upstream: Mutex<Vec<Subscription>>,
}

/// Single-value asynchronous producer.
///
/// Cheap to clone: clones share the same underlying state.
pub struct Promise<T, E> {
    inner: Arc<Inner<T, E>>,
}

/// The producing side of a [`Promise`].
///
/// Must be consumed exactly once with [`complete`](Self::complete) (or
/// [`succeed`](Self::succeed) / [`fail`](Self::fail)).
pub struct Completer<T, E> {
    inner: Option<Arc<Inner<T, E>>>,
    /// Derived completers (owned by combinators) may be dropped silently when
    /// their source terminates without a result.
    derived: bool,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Debug + Send + 'static,
{
    /// Creates a pending promise and the completer that settles it.
    #[must_use]
    pub fn pending() -> (Self, Completer<T, E>) {
        Self::pending_with(ViolationPolicy::default())
    }

    /// Like [`pending`](Self::pending), reporting violations per `policy`.
    #[must_use]
    pub fn pending_with(policy: ViolationPolicy) -> (Self, Completer<T, E>) {
        Self::pair(policy, false)
    }

    pub(crate) fn derived(policy: ViolationPolicy) -> (Self, Completer<T, E>) {
        Self::pair(policy, true)
    }

    fn pair(policy: ViolationPolicy, derived: bool) -> (Self, Completer<T, E>) {
        let inner = Arc::new(Inner {
            state: Mutex::new(State::Pending(Vec::new())),
            token: CancellationToken::new(),
            policy,
            upstream: Mutex::new(Vec::new()),
        });
        let completer = Completer {
            inner: Some(Arc::clone(&inner)),
            derived,
        };
        (Self { inner }, completer)
    }

    /// Creates a promise and invokes `work` immediately with its completer.
    ///
    /// `work` may complete synchronously or move the completer elsewhere (a
    /// timer, another task) and complete later.
    pub fn create<W>(work: W) -> Self
    where
        W: FnOnce(Completer<T, E>),
    {
        let (promise, completer) = Self::pending();
        work(completer);
        promise
    }

    /// Creates a promise whose `work` runs on `scheduler`.
    pub fn create_on<W>(scheduler: &dyn Scheduler, work: W) -> Self
    where
        W: FnOnce(Completer<T, E>) + Send + 'static,
    {
        let (promise, completer) = Self::pending();
        scheduler.schedule(Box::new(move || work(completer)));
        promise
    }

    /// Runs an async block on the tokio runtime and completes with its result.
    ///
    /// The block receives the promise's [`CancellationToken`]; after
    /// [`cancel`](Self::cancel) the block is dropped at its next suspension point
    /// and nothing is delivered.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime (same as `tokio::spawn`).
    ///
    /// # Example
    /// ```rust
    /// use relaykit::Promise;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     let p = Promise::<u32, String>::spawn(|_ctx: CancellationToken| async move { Ok(40 + 2) });
    ///     assert_eq!(p.await, Ok(42));
    /// }
    /// ```
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (promise, completer) = Self::pending();
        let token = promise.inner.token.clone();
        let fut = f(token.clone());

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => None,
                res = fut => Some(res),
            };
            if let Some(res) = outcome {
                completer.complete(res);
            }
        });
        promise
    }

    /// A promise already completed with `value`.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        Self::create(|done| done.succeed(value))
    }

    /// A promise already completed with `error`.
    #[must_use]
    pub fn rejected(error: E) -> Self {
        Self::create(|done| done.fail(error))
    }

    /// Registers the three observer callbacks.
    ///
    /// On success `on_value(v)` then `on_complete()` are called; on failure only
    /// `on_error(e)` is.
    pub fn subscribe<V, R, C>(&self, on_value: V, on_error: R, on_complete: C) -> Subscription
    where
        V: FnOnce(T) + Send + 'static,
        R: FnOnce(E) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.observe(true, move |res| match res {
            Ok(v) => {
                on_value(v);
                on_complete();
            }
            Err(e) => on_error(e),
        })
    }

    /// Registers a value-only observer.
    ///
    /// A failure is not delivered to it; if no other observer handles errors,
    /// the failure is logged.
    pub fn on_value<V>(&self, on_value: V) -> Subscription
    where
        V: FnOnce(T) + Send + 'static,
    {
        self.observe(false, move |res| {
            if let Ok(v) = res {
                on_value(v);
            }
        })
    }

    /// Registers a raw result observer.
    pub(crate) fn observe<D>(&self, handles_errors: bool, deliver: D) -> Subscription
    where
        D: FnOnce(Result<T, E>) + Send + 'static,
    {
        let observer = Observer {
            deliver: Box::new(deliver),
            handles_errors,
        };

        let replay = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Pending(slots) => {
                    let weak: Weak<Inner<T, E>> = Arc::downgrade(&self.inner);
                    let (slot, sub) = Registration::new(observer, move |id| {
                        if let Some(inner) = weak.upgrade() {
                            inner.detach(id);
                        }
                    });
                    slots.push(slot);
                    return sub;
                }
                State::Completed(result) => Some(result.clone()),
                State::Cancelled | State::Abandoned => None,
            }
        };

        if let Some(result) = replay {
            if let Err(e) = &result {
                if !observer.handles_errors {
                    tracing::warn!(error = ?e, "promise failed with no error handler");
                }
            }
            deliver_one(observer, result);
        }
        Subscription::empty()
    }

    /// Awaits the result without blocking a thread.
    ///
    /// Resolves to [`AwaitError::Cancelled`] or [`AwaitError::Abandoned`] when the
    /// promise terminates without a result.
    pub fn value(&self) -> impl Future<Output = Result<T, AwaitError<E>>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        let sub = self.observe(true, move |res| {
            let _ = tx.send(res);
        });
        let inner = Arc::clone(&self.inner);

        async move {
            let _sub = sub;
            match rx.await {
                Ok(Ok(v)) => Ok(v),
                Ok(Err(e)) => Err(AwaitError::Failed(e)),
                Err(_) => Err(inner.terminal_error()),
            }
        }
    }

    /// Cancels the promise.
    ///
    /// Signals the [`CancellationToken`] handed to [`spawn`](Self::spawn)ed work
    /// and, if still pending, moves the promise to the cancelled state without
    /// delivering anything. Returns `true` if this call did the transition.
    pub fn cancel(&self) -> bool {
        self.inner.token.cancel();
        match self.inner.terminate(State::Cancelled) {
            Some(slots) => {
                Inner::discard(slots);
                true
            }
            None => false,
        }
    }

    /// True until the promise completes, is cancelled or is abandoned.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(*self.inner.state.lock(), State::Pending(_))
    }

    /// True once the promise has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(*self.inner.state.lock(), State::Cancelled)
    }

    /// Returns a clone of the result, if the promise has completed.
    #[must_use]
    pub fn peek(&self) -> Option<Result<T, E>> {
        match &*self.inner.state.lock() {
            State::Completed(result) => Some(result.clone()),
            _ => None,
        }
    }

    /// Number of observers still waiting for the result.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        match &*self.inner.state.lock() {
            State::Pending(slots) => slots.len(),
            _ => 0,
        }
    }

    pub(crate) fn policy(&self) -> ViolationPolicy {
        self.inner.policy
    }

    /// Keeps `sub` alive until this promise is terminal.
    pub(crate) fn hold(&self, sub: Subscription) {
        let rejected = {
            let state = self.inner.state.lock();
            if matches!(*state, State::Pending(_)) {
                self.inner.upstream.lock().push(sub);
                None
            } else {
                Some(sub)
            }
        };
        drop(rejected);
    }
}

impl<T, E> Inner<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Debug + Send + 'static,
{
    fn complete(&self, result: Result<T, E>) {
        let Some(slots) = self.terminate(State::Completed(result.clone())) else {
            tracing::debug!("completion after terminal state ignored");
            return;
        };

        let handled = slots
            .iter()
            .any(|slot| slot.peek(|o| o.handles_errors).unwrap_or(false));

        // One slot at a time: an observer may cancel a later one from its callback.
        for slot in slots {
            if let Some(observer) = slot.take() {
                deliver_one(observer, result.clone());
            }
        }

        if let Err(e) = &result {
            if !handled {
                tracing::warn!(error = ?e, "promise failed with no error handler");
            }
        }
    }

    fn terminal_error(&self) -> AwaitError<E> {
        match *self.state.lock() {
            State::Cancelled => AwaitError::Cancelled,
            _ => AwaitError::Abandoned,
        }
    }
}

impl<T, E> Inner<T, E> {
    /// Moves a pending promise to `next` and releases its upstream subscriptions.
    ///
    /// Returns the observers that were waiting, or `None` (leaving the state
    /// alone) if the promise is already terminal.
    fn terminate(&self, next: State<T, E>) -> Option<Vec<Slot<T, E>>> {
        let slots = {
            let mut state = self.state.lock();
            if !matches!(*state, State::Pending(_)) {
                return None;
            }
            match std::mem::replace(&mut *state, next) {
                State::Pending(slots) => slots,
                _ => Vec::new(),
            }
        };

        let upstream = std::mem::take(&mut *self.upstream.lock());
        drop(upstream);
        Some(slots)
    }

    /// Drops the callbacks of observers that will never be delivered to.
    ///
    /// The slots are shared with their subscriptions, so dropping the `Arc`
    /// alone would keep the callbacks (and whatever they own) alive.
    fn discard(slots: Vec<Slot<T, E>>) {
        for slot in slots {
            drop(slot.take());
        }
    }

    fn abandon(&self, derived: bool) {
        let Some(slots) = self.terminate(State::Abandoned) else {
            return;
        };
        Self::discard(slots);

        if derived {
            tracing::debug!("derived promise abandoned by its source");
        } else if std::thread::panicking() {
            tracing::warn!("completer dropped during a panic; promise abandoned");
        } else {
            self.policy
                .report("promise", ContractViolation::CompleterDropped);
        }
    }

    fn detach(&self, id: SubscriptionId) {
        let removed = {
            let mut state = self.state.lock();
            match &mut *state {
                State::Pending(slots) => slots
                    .iter()
                    .position(|s| s.id() == id)
                    .map(|pos| slots.remove(pos)),
                _ => None,
            }
        };
        drop(removed);
    }
}

fn deliver_one<T, E>(observer: Observer<T, E>, result: Result<T, E>) {
    let deliver = observer.deliver;
    if let Err(panic) = catch_unwind(AssertUnwindSafe(move || deliver(result))) {
        tracing::error!(
            panic = %panic_message(panic.as_ref()),
            "promise observer panicked"
        );
    }
}

impl<T, E> Completer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Debug + Send + 'static,
{
    /// Settles the promise with `result` and delivers it to every current subscriber.
    ///
    /// Completing a cancelled promise is a no-op.
    pub fn complete(mut self, result: Result<T, E>) {
        if let Some(inner) = self.inner.take() {
            inner.complete(result);
        }
    }

    /// Shorthand for `complete(Ok(value))`.
    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    /// Shorthand for `complete(Err(error))`.
    pub fn fail(self, error: E) {
        self.complete(Err(error));
    }

    /// True once the promise has been cancelled; work may stop early.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner
            .as_ref()
            .is_none_or(|inner| inner.token.is_cancelled())
    }

    /// Returns the promise's cancellation token for cooperative work.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        match &self.inner {
            Some(inner) => inner.token.clone(),
            None => CancellationToken::new(),
        }
    }
}

impl<T, E> Drop for Completer<T, E> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.abandon(self.derived);
        }
    }
}

impl<T, E> IntoFuture for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Debug + Send + 'static,
{
    type Output = Result<T, AwaitError<E>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.value().boxed()
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.state.lock() {
            State::Pending(_) => "pending",
            State::Completed(Ok(_)) => "succeeded",
            State::Completed(Err(_)) => "failed",
            State::Cancelled => "cancelled",
            State::Abandoned => "abandoned",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}

impl<T, E> fmt::Debug for Completer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("used", &self.inner.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::{Immediate, SerialQueue};

    type Log = Arc<Mutex<Vec<String>>>;

    fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn observe_all(p: &Promise<u32, String>, log: &Log, tag: &str) -> Subscription {
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let (t1, t2, t3) = (tag.to_string(), tag.to_string(), tag.to_string());
        p.subscribe(
            move |v| l1.lock().push(format!("{t1}:value:{v}")),
            move |e| l2.lock().push(format!("{t2}:error:{e}")),
            move || l3.lock().push(format!("{t3}:complete")),
        )
    }

    #[test]
    fn value_then_complete_for_every_subscriber() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let _a = observe_all(&p, &log, "a");
        let _b = observe_all(&p, &log, "b");

        done.succeed(7);

        assert_eq!(
            *log.lock(),
            vec!["a:value:7", "a:complete", "b:value:7", "b:complete"]
        );
    }

    #[test]
    fn error_skips_value_and_complete() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let _a = observe_all(&p, &log, "a");

        done.fail("offline".into());

        assert_eq!(*log.lock(), vec!["a:error:offline"]);
    }

    #[test]
    fn cancelled_subscription_receives_nothing() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let a = observe_all(&p, &log, "a");
        let _b = observe_all(&p, &log, "b");

        a.cancel();
        a.cancel();
        assert_eq!(p.observer_count(), 1);
        done.succeed(1);

        assert_eq!(*log.lock(), vec!["b:value:1", "b:complete"]);
    }

    #[test]
    fn observer_may_cancel_a_later_one() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let later = Arc::new(Mutex::new(None::<Subscription>));

        let l = later.clone();
        let _first = p.on_value(move |_| {
            if let Some(sub) = l.lock().take() {
                sub.cancel();
            }
        });
        *later.lock() = Some(observe_all(&p, &log, "later"));

        done.succeed(1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn subscribing_after_completion_replays() {
        let p = Promise::<u32, String>::resolved(3);
        let log = log();
        let sub = observe_all(&p, &log, "late");

        assert!(!sub.is_active());
        assert_eq!(*log.lock(), vec!["late:value:3", "late:complete"]);
    }

    #[test]
    fn create_runs_work_immediately() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = runs.clone();
        let p = Promise::<u32, String>::create(move |done| {
            r.fetch_add(1, Ordering::SeqCst);
            done.succeed(1);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(p.peek(), Some(Ok(1)));
    }

    #[test]
    fn create_on_uses_scheduler() {
        let p = Promise::<u32, String>::create_on(&Immediate, |done| done.succeed(2));
        assert_eq!(p.peek(), Some(Ok(2)));
    }

    #[test]
    fn panicking_observer_does_not_block_others() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let _bad = p.on_value(|_| panic!("observer bug"));
        let _good = observe_all(&p, &log, "good");

        done.succeed(4);
        assert_eq!(*log.lock(), vec!["good:value:4", "good:complete"]);
    }

    #[test]
    fn dropped_completer_abandons() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let _a = observe_all(&p, &log, "a");

        drop(done);
        assert!(!p.is_pending());
        assert!(log.lock().is_empty());
        assert_eq!(format!("{p:?}"), "Promise { state: \"abandoned\" }");
    }

    #[test]
    #[should_panic(expected = "completer dropped")]
    fn dropped_completer_panics_under_strict_policy() {
        let (_p, done) = Promise::<u32, String>::pending_with(ViolationPolicy::Panic);
        drop(done);
    }

    #[test]
    fn cancel_prevents_delivery() {
        let (p, done) = Promise::<u32, String>::pending();
        let log = log();
        let _a = observe_all(&p, &log, "a");

        assert!(p.cancel());
        assert!(!p.cancel());
        assert!(done.is_cancelled());
        done.succeed(1);

        assert!(p.is_cancelled());
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn await_value_and_failure() {
        assert_eq!(Promise::<u32, String>::resolved(1).await, Ok(1));
        assert_eq!(
            Promise::<u32, String>::rejected("x".into()).await,
            Err(AwaitError::Failed("x".to_string()))
        );
    }

    #[tokio::test]
    async fn await_cancelled() {
        let (p, _done) = Promise::<u32, String>::pending();
        let waiting = p.value();
        p.cancel();
        assert_eq!(waiting.await, Err(AwaitError::Cancelled));
    }

    #[tokio::test]
    async fn awaiter_sees_abandonment_of_pending_promise() {
        let (p, done) = Promise::<u32, String>::pending_with(ViolationPolicy::Ignore);
        let waiting = p.value();
        let also_waiting = p.clone().into_future();

        drop(done);
        assert_eq!(waiting.await, Err(AwaitError::Abandoned));
        assert_eq!(also_waiting.await, Err(AwaitError::Abandoned));
    }

    #[test]
    fn terminal_without_result_drops_observer_callbacks() {
        let held = Arc::new(());
        let (p, done) = Promise::<u32, String>::pending_with(ViolationPolicy::Ignore);
        let (cancelled, _other) = Promise::<u32, String>::pending();

        let h1 = held.clone();
        let _a = p.on_value(move |_| drop(h1));
        let h2 = held.clone();
        let _b = cancelled.on_value(move |_| drop(h2));
        assert_eq!(Arc::strong_count(&held), 3);

        drop(done);
        cancelled.cancel();
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_completes_with_future_output() {
        let p = Promise::<u32, String>::spawn(|_ctx| async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok(11)
        });
        assert!(p.is_pending());
        assert_eq!(p.await, Ok(11));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_spawned_work() {
        let finished = Arc::new(AtomicUsize::new(0));
        let f = finished.clone();
        let p = Promise::<u32, String>::spawn(move |ctx| async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            f.fetch_add(1, Ordering::SeqCst);
            if ctx.is_cancelled() {
                return Err("cancelled".into());
            }
            Ok(1)
        });

        p.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        assert_eq!(p.value().await, Err(AwaitError::Cancelled));
    }

    #[tokio::test]
    async fn create_on_queue_runs_work_there() {
        let queue = SerialQueue::new("worker");
        let q = queue.clone();
        let p = Promise::<bool, String>::create_on(queue.as_ref(), move |done| {
            done.succeed(q.is_current());
        });
        assert_eq!(p.await, Ok(true));
        queue.shutdown().await;
    }
}
