//! # relaykit
//!
//! **relaykit** is a small reactive-stream library for async Rust.
//!
//! It provides a single-value producer that completes exactly once, a
//! multi-value event broadcaster, the subscription discipline both rely on,
//! and a scheduling adapter that moves deliveries onto a designated execution
//! context. A headless company list ([`catalog`]) exercises all of it end to end.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────────┐                        ┌──────────────────┐
//!     │  Promise<T, E>   │                        │  Broadcaster<T>  │
//!     │ (completes once) │                        │ (zero or more)   │
//!     └────────┬─────────┘                        └────────┬─────────┘
//!              │ map / map_err / zip                       │ next_value()
//!              │ deliver_on(scheduler)                     │ deliver_on(scheduler)
//!              ▼                                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registration slots (one per observer)                            │
//! │  - read right before each delivery, never under a lock            │
//! │  - cleared by Subscription::cancel / drop                         │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        ▼                                              ▼
//!   on_value / on_error / on_complete             on_value(v) per send
//!        │                                              │
//!        └──────────────► Subscription ◄────────────────┘
//!                             │ store_in(&mut bag)
//!                             ▼
//!                      SubscriptionBag (cancel_all / drop)
//! ```
//!
//! ### Delivery
//! ```text
//! Completer::complete(res) ──► state: Pending ─► Completed(res)
//!   ├─► for each observer slot (registration order):
//!   │     ├─ Ok(v)  ─► on_value(v), on_complete()
//!   │     └─ Err(e) ─► on_error(e)
//!   │     (panics caught → tracing::error!)
//!   ├─► no error handler for Err(e) ─► tracing::warn!
//!   └─► release upstream subscriptions (derived promises)
//!
//! Completer dropped ──► state: Pending ─► Abandoned
//!   └─► ContractViolation::CompleterDropped ─► ViolationPolicy (Ignore | Warn | Panic)
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Producers**     | One-shot promise and multi-value broadcaster.                  | [`Promise`], [`Completer`], [`Broadcaster`] |
//! | **Subscriptions** | RAII cancellation handles and batch release.                   | [`Subscription`], [`SubscriptionBag`]       |
//! | **Scheduling**    | Run work or deliveries on a designated context.                | [`Scheduler`], [`Immediate`], [`SerialQueue`] |
//! | **Errors**        | Typed contract violations and await results.                   | [`ContractViolation`], [`AwaitError`]       |
//! | **Policies**      | How contract violations are surfaced.                          | [`ViolationPolicy`]                         |
//! | **Configuration** | Centralize settings.                                           | [`Config`]                                  |
//! | **Catalog**       | Headless company list, cells and mock API.                     | [`CompanyList`], [`ActionCell`], [`CompanySource`] |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use relaykit::{CompanyList, Config, MockCompanySource, Scheduler, SerialQueue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = Config { fetch_delay: std::time::Duration::from_millis(10), ..Config::default() };
//!     let main_queue = SerialQueue::from_config(&cfg);
//!
//!     let source = MockCompanySource::from_config(&cfg, main_queue.clone());
//!     let mut list = CompanyList::new(Arc::new(source), main_queue.clone());
//!
//!     let rows = list.load().await.expect("mock source never fails");
//!     assert_eq!(rows.len(), 4);
//!     assert_eq!(list.row(0).as_deref(), Some("Apple"));
//!
//!     main_queue.shutdown().await;
//! }
//! ```
pub mod catalog;
mod config;
mod error;
mod policies;
mod producers;
mod schedulers;
mod subscriptions;

// ---- Public re-exports ----

pub use catalog::{ActionCell, CompanyList, CompanySource, MockCompanySource, Tap};
pub use config::Config;
pub use error::{AwaitError, ContractViolation, FetchError};
pub use policies::ViolationPolicy;
pub use producers::{Broadcaster, Completer, Promise};
pub use schedulers::{Immediate, Job, Scheduler, SchedulerRef, SerialQueue};
pub use subscriptions::{Subscription, SubscriptionBag, SubscriptionId};
