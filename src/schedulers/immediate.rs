//! # Immediate scheduler.
//!
//! [`Immediate`] runs jobs synchronously on the calling thread. Delayed jobs run
//! on a tokio timer task when a runtime is available, otherwise on a helper
//! thread.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use super::{Job, Scheduler, SchedulerRef, run_job};

/// Scheduler that runs jobs inline.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl Immediate {
    /// Returns the scheduler as a shared handle.
    #[must_use]
    pub fn arc() -> SchedulerRef {
        Arc::new(Immediate)
    }
}

impl Scheduler for Immediate {
    fn schedule(&self, job: Job) {
        run_job("immediate", job);
    }

    fn schedule_after(&self, delay: Duration, job: Job) {
        match Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    tokio::time::sleep(delay).await;
                    run_job("immediate", job);
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    run_job("immediate", job);
                });
            }
        }
    }

    fn name(&self) -> &'static str {
        "immediate"
    }
}
