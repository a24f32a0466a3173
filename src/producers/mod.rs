//! Producers: single-value promises and multi-value broadcasters.
//!
//! This module groups the two producer kinds and their composition helpers.
//!
//! ## Contents
//! - [`Promise`], [`Completer`] a computation that completes exactly once
//! - [`Broadcaster`] zero or more values to zero or more observers, no error channel
//! - `compose` derived promises (`map`, `map_err`, `zip`, `deliver_on`)
//!
//! ## Quick reference
//! ```text
//! Promise::create(|done| ..)  ──► subscribe(on_value, on_error, on_complete)
//!                                  └─► value().await / .await
//! Broadcaster::new()          ──► subscribe(on_value)
//!     └─► send(v)                  └─► next_value() → Promise<T, Infallible>
//! ```

mod broadcaster;
mod compose;
mod promise;

pub use broadcaster::Broadcaster;
pub use promise::{Completer, Promise};
