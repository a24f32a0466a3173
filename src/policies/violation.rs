//! # Contract violation policy.
//!
//! [`ViolationPolicy`] decides how a detected [`ContractViolation`] is surfaced.
//!
//! - [`ViolationPolicy::Ignore`] the violation is dropped silently (only visible at `debug` level).
//! - [`ViolationPolicy::Warn`] the violation is logged with `tracing::warn!` (default).
//! - [`ViolationPolicy::Panic`] the violation panics at the point of detection.
//!
//! ## Choosing the right policy
//! ```text
//! Production services            → Warn
//! Tests that must catch misuse   → Panic
//! Fire-and-forget producers      → Ignore
//! ```

use crate::error::ContractViolation;

/// Policy controlling how contract violations are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViolationPolicy {
    /// Drop the violation; logged at `debug` level only.
    Ignore,
    /// Log the violation as a warning (default).
    #[default]
    Warn,
    /// Panic with the violation message.
    Panic,
}

impl ViolationPolicy {
    /// Reports `violation` according to this policy.
    ///
    /// `source` names the component that detected it (a scheduler name, `"promise"`).
    pub fn report(self, source: &str, violation: ContractViolation) {
        match self {
            ViolationPolicy::Ignore => {
                tracing::debug!(source, label = violation.as_label(), "contract violation ignored");
            }
            ViolationPolicy::Warn => {
                tracing::warn!(
                    source,
                    label = violation.as_label(),
                    "contract violation: {violation}"
                );
            }
            ViolationPolicy::Panic => {
                panic!("[relaykit] {source}: {violation}");
            }
        }
    }
}
