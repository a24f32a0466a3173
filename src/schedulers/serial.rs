//! # SerialQueue: a designated execution context.
//!
//! [`SerialQueue`] owns one worker task that drains an unbounded FIFO of jobs.
//! It plays the role of "the thread that owns the UI": everything delivered
//! through `deliver_on(queue)` runs there, one job at a time, in submission order.
//!
//! ## Rules
//! - **FIFO**: jobs run in the order `schedule` accepted them.
//! - **Serial**: a job never overlaps another job of the same queue.
//! - **Panic isolation**: a panicking job is logged; the worker keeps running.
//! - **Shutdown drains**: [`Scheduler::shutdown`] stops accepting jobs and waits
//!   for accepted ones, including delayed jobs whose timer is still pending.
//! - After shutdown, submitting a job is a
//!   [`ContractViolation::SchedulerClosed`](crate::ContractViolation), reported
//!   per the queue's [`ViolationPolicy`].
//!
//! ## Example
//! ```rust
//! use relaykit::{Scheduler, SerialQueue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let main_queue = SerialQueue::new("main");
//!     let q = main_queue.clone();
//!     main_queue.schedule(Box::new(move || assert!(q.is_current())));
//!     main_queue.shutdown().await;
//! }
//! ```

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Job, Scheduler, run_job};
use crate::config::Config;
use crate::error::ContractViolation;
use crate::policies::ViolationPolicy;

static QUEUE_SEQ: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Id of the queue whose job is running on this thread (0 = none).
    static CURRENT_QUEUE: Cell<u64> = const { Cell::new(0) };
}

/// Single-worker FIFO execution context.
pub struct SerialQueue {
    id: u64,
    name: &'static str,
    policy: ViolationPolicy,
    runtime: Handle,
    sender: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SerialQueue {
    /// Creates a queue on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime (same as `tokio::spawn`).
    #[must_use]
    pub fn new(name: &'static str) -> Arc<Self> {
        Self::with_handle(name, Handle::current(), ViolationPolicy::default())
    }

    /// Creates a queue named `cfg.queue_name` reporting violations per `cfg.violation`.
    #[must_use]
    pub fn from_config(cfg: &Config) -> Arc<Self> {
        Self::with_handle(cfg.queue_name, Handle::current(), cfg.violation)
    }

    /// Creates a queue whose worker runs on `runtime`.
    #[must_use]
    pub fn with_handle(name: &'static str, runtime: Handle, policy: ViolationPolicy) -> Arc<Self> {
        let id = QUEUE_SEQ.fetch_add(1, AtomicOrdering::Relaxed);
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        let worker = runtime.spawn(async move {
            while let Some(job) = rx.recv().await {
                let prev = CURRENT_QUEUE.with(|c| c.replace(id));
                run_job(name, job);
                CURRENT_QUEUE.with(|c| c.set(prev));
            }
            tracing::debug!(queue = name, "serial queue drained");
        });

        Arc::new(Self {
            id,
            name,
            policy,
            runtime,
            sender: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// True when called from a job running on this queue.
    #[must_use]
    pub fn is_current(&self) -> bool {
        CURRENT_QUEUE.with(|c| c.get() == self.id)
    }

    /// True once [`shutdown`](Scheduler::shutdown) has been requested.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    fn sender(&self) -> Option<mpsc::UnboundedSender<Job>> {
        self.sender.lock().clone()
    }

    fn reject(&self) {
        self.policy.report(
            self.name,
            ContractViolation::SchedulerClosed {
                scheduler: self.name,
            },
        );
    }
}

#[async_trait]
impl Scheduler for SerialQueue {
    fn schedule(&self, job: Job) {
        match self.sender() {
            Some(tx) => {
                if tx.send(job).is_err() {
                    self.reject();
                }
            }
            None => self.reject(),
        }
    }

    fn schedule_after(&self, delay: Duration, job: Job) {
        let Some(tx) = self.sender() else {
            self.reject();
            return;
        };
        let name = self.name;
        let policy = self.policy;

        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(job).is_err() {
                policy.report(name, ContractViolation::SchedulerClosed { scheduler: name });
            }
        });
    }

    fn name(&self) -> &'static str {
        self.name
    }

    async fn shutdown(&self) {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(queue = self.name, error = %e, "serial queue worker failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Job) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        let push = move |n: u32| -> Job {
            let l = l.clone();
            Box::new(move || l.lock().push(n))
        };
        (log, push)
    }

    #[tokio::test]
    async fn runs_jobs_in_order() {
        let q = SerialQueue::new("test");
        let (log, push) = recorder();
        for n in 0..5 {
            q.schedule(push(n));
        }
        q.shutdown().await;
        assert_eq!(*log.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn jobs_see_their_queue_as_current() {
        let q = SerialQueue::new("test");
        let other = SerialQueue::new("other");
        let seen = Arc::new(AtomicBool::new(false));

        let (q2, other2, s) = (q.clone(), other.clone(), seen.clone());
        q.schedule(Box::new(move || {
            s.store(q2.is_current() && !other2.is_current(), AtomicOrdering::SeqCst);
        }));
        q.shutdown().await;
        other.shutdown().await;

        assert!(seen.load(AtomicOrdering::SeqCst));
        assert!(!q.is_current());
    }

    #[tokio::test]
    async fn panicking_job_does_not_stop_worker() {
        let q = SerialQueue::new("test");
        let (log, push) = recorder();
        q.schedule(Box::new(|| panic!("job failed")));
        q.schedule(push(7));
        q.shutdown().await;
        assert_eq!(*log.lock(), vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_delayed_jobs() {
        let q = SerialQueue::new("test");
        let (log, push) = recorder();
        q.schedule_after(Duration::from_secs(3), push(1));
        q.schedule(push(0));
        q.shutdown().await;
        assert_eq!(*log.lock(), vec![0, 1]);
    }

    #[tokio::test]
    async fn schedule_after_shutdown_is_rejected() {
        let q = SerialQueue::new("test");
        q.shutdown().await;
        assert!(q.is_closed());

        let (log, push) = recorder();
        q.schedule(push(1));
        q.schedule_after(Duration::from_millis(1), push(2));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    #[should_panic(expected = "is closed")]
    async fn panic_policy_surfaces_rejection() {
        let q = SerialQueue::with_handle("strict", Handle::current(), ViolationPolicy::Panic);
        q.shutdown().await;
        q.schedule(Box::new(|| {}));
    }
}
