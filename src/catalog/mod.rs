//! # Catalog: a headless company list built on relaykit.
//!
//! The pieces a list screen needs, without any rendering:
//!
//! - [`CompanySource`] / [`MockCompanySource`] fetch the company names; the mock
//!   answers after a simulated network delay.
//! - [`CompanyList`] loads the names, receives them on its designated queue and
//!   keeps every subscription it creates in one [`SubscriptionBag`](crate::SubscriptionBag).
//! - [`ActionCell`] replaces a delegate callback with a per-cell
//!   [`Broadcaster<String>`](crate::Broadcaster); its bindings are scoped to one
//!   configuration, so a reused cell never accumulates observers.
//!
//! ## Flow
//! ```text
//! CompanyList::load()
//!   └─► source.fetch_companies() ──(delay)──► Promise<Vec<String>, FetchError>
//!         └─► deliver_on(ui) ──► on_value: models = rows, reloads.send(len)
//!                           └──► on_error: tracing::error!, last_error = e
//!
//! CompanyList::configure(cell, row)
//!   └─► cell.prepare_for_reuse() ──► cell.bind(|msg| taps.send(Tap { row, msg }))
//! ```

mod cell;
mod list;
mod source;

pub use cell::{ActionCell, TAP_MESSAGE};
pub use list::{CompanyList, Tap};
pub use source::{COMPANIES, CompanySource, MockCompanySource};
