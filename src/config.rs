//! # Global configuration.
//!
//! Provides [`Config`] centralized settings for producers, schedulers and the
//! catalog demo.
//!
//! Config is used in three ways:
//! 1. **Scheduler creation**: `SerialQueue::from_config(&config)`
//! 2. **Promise creation**: `Promise::pending_with(config.violation)`
//! 3. **Mock source**: `MockCompanySource::from_config(&config, scheduler)`
//!
//! ## Sentinel values
//! - `fetch_delay = 0s` → complete on the next turn of the scheduler (no timer)

use std::time::Duration;

use crate::policies::ViolationPolicy;

/// Global configuration.
///
/// ## Field semantics
/// - `violation`: How contract violations are surfaced (default: warn)
/// - `fetch_delay`: Simulated latency of the mock company source (`0s` = no timer)
/// - `queue_name`: Name of the designated delivery queue (used in logs)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Policy applied when a contract violation is detected.
    pub violation: ViolationPolicy,

    /// Simulated network latency of the mock company source.
    ///
    /// - `Duration::ZERO` = the result is scheduled immediately
    /// - `> 0` = the result is scheduled after the delay
    pub fetch_delay: Duration,

    /// Name of the designated delivery queue.
    pub queue_name: &'static str,
}

impl Config {
    /// Returns the simulated fetch delay as an `Option`.
    ///
    /// - `None` → schedule immediately
    /// - `Some(d)` → schedule after `d`
    #[inline]
    pub fn fetch_delay(&self) -> Option<Duration> {
        if self.fetch_delay == Duration::ZERO {
            None
        } else {
            Some(self.fetch_delay)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `violation = ViolationPolicy::Warn`
    /// - `fetch_delay = 3s`
    /// - `queue_name = "main"`
    fn default() -> Self {
        Self {
            violation: ViolationPolicy::default(),
            fetch_delay: Duration::from_secs(3),
            queue_name: "main",
        }
    }
}
