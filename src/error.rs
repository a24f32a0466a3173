//! Error types used by relaykit producers, schedulers and the catalog demo.
//!
//! This module defines three enums:
//!
//! - [`ContractViolation`] programming defects detected at runtime (a completer
//!   dropped without completing, a job handed to a closed scheduler).
//! - [`AwaitError`] what awaiting a [`Promise`](crate::Promise) yields when it
//!   does not produce a value.
//! - [`FetchError`] failures reported by a [`CompanySource`](crate::CompanySource).
//!
//! All of them provide `as_label` (stable snake_case, for logs/metrics) and
//! `as_message` (human-readable details), like the rest of the crate's errors.

use std::fmt::Debug;

use thiserror::Error;

/// # Contract violations.
///
/// These are defects in the calling code, not runtime failures. They never
/// unwind across a subscribe/send/complete call; instead they are reported
/// through [`ViolationPolicy::report`](crate::ViolationPolicy::report).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// A [`Completer`](crate::Completer) was dropped without calling `complete`.
    #[error("completer dropped without completing; promise abandoned")]
    CompleterDropped,

    /// A job was submitted to a scheduler that is already shut down.
    #[error("scheduler '{scheduler}' is closed; job dropped")]
    SchedulerClosed {
        /// Name of the scheduler that rejected the job.
        scheduler: &'static str,
    },
}

impl ContractViolation {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use relaykit::ContractViolation;
    ///
    /// let v = ContractViolation::SchedulerClosed { scheduler: "main" };
    /// assert_eq!(v.as_label(), "scheduler_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContractViolation::CompleterDropped => "completer_dropped",
            ContractViolation::SchedulerClosed { .. } => "scheduler_closed",
        }
    }

    /// Returns a human-readable message with details about the violation.
    pub fn as_message(&self) -> String {
        match self {
            ContractViolation::CompleterDropped => "completer dropped".to_string(),
            ContractViolation::SchedulerClosed { scheduler } => {
                format!("scheduler closed: {scheduler}")
            }
        }
    }
}

/// # Errors produced by awaiting a promise.
///
/// `E` is the promise's own failure type; it is carried unchanged in
/// [`AwaitError::Failed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AwaitError<E: Debug> {
    /// The producer completed with an error.
    #[error("promise failed: {0:?}")]
    Failed(E),

    /// The producer can never complete (its completer was dropped).
    #[error("promise abandoned before completing")]
    Abandoned,

    /// The promise was cancelled before completing.
    #[error("promise cancelled")]
    Cancelled,
}

impl<E: Debug> AwaitError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AwaitError::Failed(_) => "promise_failed",
            AwaitError::Abandoned => "promise_abandoned",
            AwaitError::Cancelled => "promise_cancelled",
        }
    }

    /// Returns the producer error, if this is [`AwaitError::Failed`].
    pub fn into_failure(self) -> Option<E> {
        match self {
            AwaitError::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// # Errors produced by a company source.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote side could not be reached.
    #[error("source unavailable: {reason}")]
    Unavailable {
        /// The underlying reason.
        reason: String,
    },
}

impl FetchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use relaykit::FetchError;
    ///
    /// let err = FetchError::Unavailable { reason: "offline".into() };
    /// assert_eq!(err.as_label(), "fetch_unavailable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::Unavailable { .. } => "fetch_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            FetchError::Unavailable { reason } => format!("unavailable: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ContractViolation::CompleterDropped.as_label(), "completer_dropped");
        assert_eq!(AwaitError::<()>::Abandoned.as_label(), "promise_abandoned");
        assert_eq!(AwaitError::<()>::Cancelled.as_label(), "promise_cancelled");
        assert_eq!(AwaitError::Failed(1).as_label(), "promise_failed");
    }

    #[test]
    fn into_failure_only_for_failed() {
        assert_eq!(AwaitError::Failed("boom").into_failure(), Some("boom"));
        assert_eq!(AwaitError::<&str>::Abandoned.into_failure(), None);
    }

    #[test]
    fn display_includes_details() {
        let v = ContractViolation::SchedulerClosed { scheduler: "main" };
        assert_eq!(v.to_string(), "scheduler 'main' is closed; job dropped");

        let e = FetchError::Unavailable {
            reason: "offline".into(),
        };
        assert_eq!(e.as_message(), "unavailable: offline");
    }
}
