//! # Schedulers: execution contexts for deliveries and work.
//!
//! A [`Scheduler`] runs boxed jobs "now" or "after a delay" on some execution
//! context. Producers use it in two places:
//!
//! - `Promise::create_on(scheduler, work)` runs the producer's work there;
//! - `deliver_on(scheduler)` re-enqueues every delivery there before it reaches
//!   subscriber callbacks.
//!
//! ## Contents
//! - [`Scheduler`], [`SchedulerRef`], [`Job`] the abstraction
//! - [`Immediate`] runs jobs inline on the caller
//! - [`SerialQueue`] a designated context: one worker, FIFO, one job at a time
//!
//! ## Diagram
//! ```text
//!   schedule(job) ──► [unbounded FIFO] ──► worker task ──► job()
//!                                                  └─► panic caught → tracing::error!
//! ```

mod immediate;
mod scheduler;
mod serial;

pub use immediate::Immediate;
pub(crate) use scheduler::{panic_message, run_job};
pub use scheduler::{Job, Scheduler, SchedulerRef};
pub use serial::SerialQueue;
