//! # Scheduler trait.
//!
//! Provides [`Scheduler`] the extension point for plugging execution contexts into
//! producers. Jobs are plain synchronous closures; a scheduler decides *where*
//! and *when* they run, never *whether* (a closed scheduler reports a
//! [`ContractViolation::SchedulerClosed`](crate::ContractViolation)).
//!
//! ## Rules
//! - A job never unwinds into the scheduler: panics are caught and logged.
//! - Ordering guarantees are per implementation ([`SerialQueue`](crate::SerialQueue)
//!   is FIFO; [`Immediate`](crate::Immediate) runs in the caller's order).

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// A unit of work handed to a scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a scheduler (`Arc<dyn Scheduler>`).
pub type SchedulerRef = Arc<dyn Scheduler>;

/// Execution context for jobs.
///
/// ### Implementation requirements
/// - `schedule` and `schedule_after` must not block the caller.
/// - A job must run at most once.
/// - Panics inside jobs must not escape (use [`run_job`]).
#[async_trait]
pub trait Scheduler: Send + Sync + 'static {
    /// Runs `job` as soon as the context allows.
    fn schedule(&self, job: Job);

    /// Runs `job` on this context once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, job: Job);

    /// Returns the scheduler name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose; override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Stops accepting jobs and waits for accepted ones to finish.
    ///
    /// Default: nothing to shut down.
    async fn shutdown(&self) {}
}

/// Runs one job, catching and logging a panic instead of unwinding.
pub(crate) fn run_job(scheduler: &str, job: Job) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
        tracing::error!(
            scheduler,
            panic = %panic_message(panic.as_ref()),
            "scheduled job panicked"
        );
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
