//! Runtime policies.
//!
//! ## Contents
//! - [`ViolationPolicy`] what to do when calling code breaks a producer contract
//!   (ignore / log a warning / panic)
//!
//! ## Quick wiring
//! ```text
//! Config { violation: ViolationPolicy, .. }
//!      ├─► Promise::pending_with(policy)  → completer dropped without completing
//!      └─► SerialQueue::from_config(cfg)  → job submitted after shutdown
//! ```
//!
//! ## Defaults
//! - `ViolationPolicy::Warn` (log through `tracing`, keep running).

mod violation;

pub use violation::ViolationPolicy;
