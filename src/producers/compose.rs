//! # Derived promises.
//!
//! Combinators build a new [`Promise`] that observes one or more sources. The
//! derived promise keeps its source subscriptions alive until it is terminal,
//! then releases them.
//!
//! ## Rules
//! - A source failure propagates unchanged (`map`, `zip`) or mapped (`map_err`).
//! - A source that is cancelled or abandoned leaves the derived promise
//!   abandoned; this is not reported as a contract violation.
//! - Forwarders count as error handlers, so a source never logs an "unhandled"
//!   failure that a derived promise carries on; the derived promise logs it
//!   instead if nobody handles it there.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

use super::promise::{Completer, Promise};
use crate::schedulers::SchedulerRef;

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Debug + Send + 'static,
{
    /// Returns a promise completing with `f(value)` once this one succeeds.
    ///
    /// # Example
    /// ```rust
    /// use relaykit::Promise;
    ///
    /// let names = Promise::<Vec<&str>, String>::resolved(vec!["Apple", "Google"]);
    /// let count = names.map(|v| v.len());
    /// assert_eq!(count.peek(), Some(Ok(2)));
    /// ```
    pub fn map<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let (down, done) = Promise::derived(self.policy());
        let sub = self.observe(true, move |res| done.complete(res.map(f)));
        down.hold(sub);
        down
    }

    /// Returns a promise whose failure is `f(error)`.
    pub fn map_err<E2, F>(&self, f: F) -> Promise<T, E2>
    where
        E2: Clone + Debug + Send + 'static,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        let (down, done) = Promise::derived(self.policy());
        let sub = self.observe(true, move |res| done.complete(res.map_err(f)));
        down.hold(sub);
        down
    }

    /// Returns a promise completing with both values once both sources succeed.
    ///
    /// Fails with the first failure of either source.
    pub fn zip<U>(&self, other: &Promise<U, E>) -> Promise<(T, U), E>
    where
        U: Clone + Send + 'static,
    {
        let (down, done) = Promise::derived(self.policy());
        let join = Arc::new(Mutex::new(Zip {
            left: None,
            right: None,
            done: Some(done),
        }));

        let l = ZipSide::new(&join, Side::Left);
        let left = self.observe(true, move |res| {
            Zip::settle(&*l.join, |z| res.map(|v| z.left = Some(v)));
        });
        let r = ZipSide::new(&join, Side::Right);
        let right = other.observe(true, move |res| {
            Zip::settle(&*r.join, |z| res.map(|v| z.right = Some(v)));
        });

        down.hold(left);
        down.hold(right);
        down
    }

    /// Returns a promise delivering this promise's result on `scheduler`.
    ///
    /// Subscriber callbacks of the returned promise run on that context, after
    /// the source completes.
    pub fn deliver_on(&self, scheduler: &SchedulerRef) -> Promise<T, E> {
        let (down, done) = Promise::derived(self.policy());
        let scheduler = Arc::clone(scheduler);
        let sub = self.observe(true, move |res| {
            scheduler.schedule(Box::new(move || done.complete(res)));
        });
        down.hold(sub);
        down
    }
}

/// Join state of [`Promise::zip`].
struct Zip<T, U, E> {
    left: Option<T>,
    right: Option<U>,
    done: Option<Completer<(T, U), E>>,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// One source's hold on the join state.
///
/// Dropped without having stored a value (its source was cancelled or
/// abandoned), it abandons the zipped promise too.
struct ZipSide<T, U, E> {
    join: Arc<Mutex<Zip<T, U, E>>>,
    side: Side,
}

impl<T, U, E> ZipSide<T, U, E> {
    fn new(join: &Arc<Mutex<Zip<T, U, E>>>, side: Side) -> Self {
        Self {
            join: Arc::clone(join),
            side,
        }
    }
}

impl<T, U, E> Drop for ZipSide<T, U, E> {
    fn drop(&mut self) {
        let orphaned = {
            let mut z = self.join.lock();
            let stored = match self.side {
                Side::Left => z.left.is_some(),
                Side::Right => z.right.is_some(),
            };
            if stored { None } else { z.done.take() }
        };
        drop(orphaned);
    }
}

impl<T, U, E> Zip<T, U, E>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    E: Clone + Debug + Send + 'static,
{
    fn settle<F>(join: &Mutex<Self>, update: F)
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        let ready = {
            let mut z = join.lock();
            match update(&mut z) {
                Err(e) => z.done.take().map(|done| (done, Err(e))),
                Ok(()) => match (z.left.take(), z.right.take()) {
                    (Some(l), Some(r)) => z.done.take().map(|done| (done, Ok((l, r)))),
                    (l, r) => {
                        z.left = l;
                        z.right = r;
                        None
                    }
                },
            }
        };

        if let Some((done, result)) = ready {
            done.complete(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{AwaitError, Immediate, Scheduler, SerialQueue};

    #[test]
    fn map_transforms_value() {
        let (p, done) = Promise::<u32, String>::pending();
        let doubled = p.map(|v| v * 2);
        assert!(doubled.is_pending());

        done.succeed(21);
        assert_eq!(doubled.peek(), Some(Ok(42)));
    }

    #[test]
    fn map_propagates_failure() {
        let p = Promise::<u32, String>::rejected("boom".into());
        let mapped = p.map(|v| v + 1);
        assert_eq!(mapped.peek(), Some(Err("boom".to_string())));
    }

    #[test]
    fn map_err_transforms_failure() {
        let p = Promise::<u32, &'static str>::rejected("boom");
        let mapped = p.map_err(|e| e.len());
        assert_eq!(mapped.peek(), Some(Err(4)));
    }

    #[test]
    fn zip_waits_for_both() {
        let (a, done_a) = Promise::<u32, String>::pending();
        let (b, done_b) = Promise::<&'static str, String>::pending();
        let both = a.zip(&b);

        done_b.succeed("b");
        assert!(both.is_pending());
        done_a.succeed(1);
        assert_eq!(both.peek(), Some(Ok((1, "b"))));
    }

    #[test]
    fn zip_fails_on_first_failure() {
        let (a, done_a) = Promise::<u32, String>::pending();
        let (b, done_b) = Promise::<u32, String>::pending();
        let both = a.zip(&b);

        done_a.fail("left".into());
        done_b.succeed(2);
        assert_eq!(both.peek(), Some(Err("left".to_string())));
    }

    #[test]
    fn derived_promise_releases_source_subscription() {
        let (p, done) = Promise::<u32, String>::pending();
        let mapped = p.map(|v| v);
        assert_eq!(p.observer_count(), 1);

        mapped.cancel();
        assert_eq!(p.observer_count(), 0);
        done.succeed(1);
        assert_eq!(mapped.peek(), None);
    }

    #[tokio::test]
    async fn cancelled_source_abandons_derived() {
        let (p, _done) = Promise::<u32, String>::pending();
        let mapped = p.map(|v| v);
        p.cancel();
        assert_eq!(mapped.value().await, Err(AwaitError::Abandoned));
    }

    #[tokio::test]
    async fn deliver_on_runs_callbacks_on_queue() {
        let queue = SerialQueue::new("ui");
        let sched: SchedulerRef = queue.clone();
        let (p, done) = Promise::<u32, String>::pending();
        let on_ui = p.deliver_on(&sched);

        let (tx, rx) = tokio::sync::oneshot::channel();
        let q = queue.clone();
        let _sub = on_ui.on_value(move |v| {
            let _ = tx.send((v, q.is_current()));
        });

        done.succeed(5);
        assert_eq!(rx.await.ok(), Some((5, true)));
        queue.shutdown().await;
    }

    /// Log sink for asserting on emitted events.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn deliver_on_closed_queue_abandons_and_reports() {
        let logs = Captured::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let queue = SerialQueue::new("ui");
        queue.shutdown().await;
        let sched: SchedulerRef = queue.clone();

        let (p, done) = Promise::<u32, String>::pending();
        let on_ui = p.deliver_on(&sched);
        let waiting = on_ui.value();

        done.succeed(1);
        assert_eq!(waiting.await, Err(AwaitError::Abandoned));
        assert!(!on_ui.is_pending());

        let out = String::from_utf8_lossy(&logs.0.lock()).into_owned();
        assert!(out.contains("scheduler 'ui' is closed"), "{out}");
    }

    #[tokio::test]
    async fn abandoned_source_resolves_derived_awaiters() {
        let (a, done_a) = Promise::<u32, String>::pending_with(crate::ViolationPolicy::Ignore);
        let (b, _done_b) = Promise::<u32, String>::pending();
        let both = a.zip(&b);
        let mapped = a.map(|v| v + 1);

        drop(done_a);
        assert_eq!(mapped.await, Err(AwaitError::Abandoned));
        assert_eq!(both.await, Err(AwaitError::Abandoned));
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_on_immediate_after_delay() {
        let sched = Immediate::arc();
        let (p, done) = Promise::<u32, String>::pending();
        Immediate.schedule_after(Duration::from_secs(3), Box::new(move || done.succeed(9)));

        assert_eq!(p.deliver_on(&sched).await, Ok(9));
    }
}
