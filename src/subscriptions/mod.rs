//! # Subscriptions: handles, registrations and bags.
//!
//! Every `subscribe` call on a [`Promise`](crate::Promise) or a
//! [`Broadcaster`](crate::Broadcaster) returns a [`Subscription`]. The handle owns
//! the right to stop delivery to its observer; dropping it has the same effect as
//! calling [`Subscription::cancel`].
//!
//! ## Architecture
//! ```text
//! producer.subscribe(cb)
//!     ├─► Registration { id, callback: Mutex<Option<cb>>, detach }
//!     │        └─► kept in the producer's observer list
//!     └─► Subscription { id, target: Arc<dyn Release> } ──► caller
//!                                      │
//!            cancel() / drop ──────────┴─► clear callback, detach from producer
//! ```
//!
//! ## Rules
//! - Cancelling is idempotent; a second cancel is a no-op.
//! - Deliveries starting after `cancel` returns never reach the callback.
//! - A [`SubscriptionBag`] releases everything it holds exactly once,
//!   explicitly (`cancel_all`) or when it is dropped.

mod bag;
mod registration;
mod subscription;

pub use bag::SubscriptionBag;
pub(crate) use registration::Registration;
pub use subscription::{Subscription, SubscriptionId};
