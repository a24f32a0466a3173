//! Company sources.
//!
//! [`CompanySource`] is the seam between the list and whatever produces its
//! data. [`MockCompanySource`] simulates a remote call: it completes on its
//! scheduler after the configured delay.

use std::time::Duration;

use crate::config::Config;
use crate::error::FetchError;
use crate::policies::ViolationPolicy;
use crate::producers::Promise;
use crate::schedulers::{Job, SchedulerRef};

/// Names returned by [`MockCompanySource`].
pub const COMPANIES: [&str; 4] = ["Apple", "Google", "Microsoft", "Amazon"];

/// Something that can fetch the company list.
pub trait CompanySource: Send + Sync {
    /// Starts a fetch; the promise completes once with the names or an error.
    fn fetch_companies(&self) -> Promise<Vec<String>, FetchError>;
}

/// Simulated API caller.
///
/// Every call to [`fetch_companies`](CompanySource::fetch_companies) schedules
/// one completion on `scheduler`, after `delay` (or on the next turn when the
/// delay is `None`).
#[derive(Clone)]
pub struct MockCompanySource {
    scheduler: SchedulerRef,
    delay: Option<Duration>,
    policy: ViolationPolicy,
    outcome: Result<Vec<String>, FetchError>,
}

impl MockCompanySource {
    /// Creates a source answering with [`COMPANIES`] using the default config.
    pub fn new(scheduler: SchedulerRef) -> Self {
        Self::from_config(&Config::default(), scheduler)
    }

    /// Creates a source answering with [`COMPANIES`] after `cfg.fetch_delay`.
    pub fn from_config(cfg: &Config, scheduler: SchedulerRef) -> Self {
        Self {
            scheduler,
            delay: cfg.fetch_delay(),
            policy: cfg.violation,
            outcome: Ok(COMPANIES.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Creates a source whose every fetch fails with [`FetchError::Unavailable`].
    pub fn failing(cfg: &Config, scheduler: SchedulerRef, reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(FetchError::Unavailable {
                reason: reason.into(),
            }),
            ..Self::from_config(cfg, scheduler)
        }
    }

    /// Simulated latency of one fetch.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Delay in whole milliseconds for logs, saturating at `u64::MAX`.
    fn delay_millis(&self) -> u64 {
        self.delay
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl CompanySource for MockCompanySource {
    fn fetch_companies(&self) -> Promise<Vec<String>, FetchError> {
        let (promise, done) = Promise::pending_with(self.policy);
        let outcome = self.outcome.clone();
        let job: Job = Box::new(move || done.complete(outcome));

        tracing::debug!(
            scheduler = self.scheduler.name(),
            delay_ms = self.delay_millis(),
            "company fetch started"
        );
        match self.delay {
            Some(delay) => self.scheduler.schedule_after(delay, job),
            None => self.scheduler.schedule(job),
        }
        promise
    }
}

impl std::fmt::Debug for MockCompanySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCompanySource")
            .field("scheduler", &self.scheduler.name())
            .field("delay", &self.delay)
            .field("fails", &self.outcome.is_err())
            .finish()
    }
}
