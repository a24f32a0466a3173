//! # CompanyList: the list controller.
//!
//! Loads company names from an injected [`CompanySource`], receives them on
//! its designated queue and exposes them as rows. Row cells are wired through
//! [`CompanyList::configure`], which forwards their taps onto the list's own
//! [`taps`](CompanyList::taps) broadcaster.
//!
//! Subscriptions created by the controller live in its bag and are released by
//! [`teardown`](CompanyList::teardown) or when the controller is dropped.

use std::sync::Arc;

use parking_lot::Mutex;

use super::cell::ActionCell;
use super::source::CompanySource;
use crate::error::FetchError;
use crate::producers::{Broadcaster, Promise};
use crate::schedulers::SchedulerRef;
use crate::subscriptions::SubscriptionBag;

/// A tap forwarded from a configured cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tap {
    /// Row of the cell that was tapped.
    pub row: usize,
    /// Message sent by the cell.
    pub message: String,
}

/// Headless list controller.
pub struct CompanyList {
    source: Arc<dyn CompanySource>,
    ui: SchedulerRef,
    models: Arc<Mutex<Vec<String>>>,
    last_error: Arc<Mutex<Option<FetchError>>>,
    reloads: Broadcaster<usize>,
    taps: Broadcaster<Tap>,
    observers: SubscriptionBag,
}

impl CompanyList {
    /// Creates an empty list fed by `source`, delivering on `ui`.
    pub fn new(source: Arc<dyn CompanySource>, ui: SchedulerRef) -> Self {
        Self {
            source,
            ui,
            models: Arc::new(Mutex::new(Vec::new())),
            last_error: Arc::new(Mutex::new(None)),
            reloads: Broadcaster::new(),
            taps: Broadcaster::new(),
            observers: SubscriptionBag::new(),
        }
    }

    /// Starts a fetch and stores the result on the `ui` scheduler.
    ///
    /// On success the rows are replaced and [`reloads`](Self::reloads) fires with
    /// the new row count; on failure the rows are left untouched and the error
    /// is logged and kept in [`last_error`](Self::last_error). The returned
    /// promise is the delivered one, so awaiting it resumes after the rows are
    /// stored.
    pub fn load(&mut self) -> Promise<Vec<String>, FetchError> {
        let delivered = self.source.fetch_companies().deliver_on(&self.ui);
        let queue = self.ui.name();

        let models = Arc::clone(&self.models);
        let reloads = self.reloads.clone();
        let last_error = Arc::clone(&self.last_error);

        delivered
            .subscribe(
                move |rows: Vec<String>| {
                    let count = rows.len();
                    *models.lock() = rows;
                    reloads.send(count);
                },
                move |e: FetchError| {
                    tracing::error!(queue, error = %e, label = e.as_label(), "company fetch failed");
                    *last_error.lock() = Some(e);
                },
                move || tracing::info!(queue, "company fetch finished"),
            )
            .store_in(&mut self.observers);

        delivered
    }

    /// Snapshot of the current rows.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.models.lock().clone()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.models.lock().len()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<String> {
        self.models.lock().get(index).cloned()
    }

    /// Error of the most recent failed load, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<FetchError> {
        self.last_error.lock().clone()
    }

    /// Fires with the row count each time a load stores new rows.
    pub fn reloads(&self) -> &Broadcaster<usize> {
        &self.reloads
    }

    /// Taps of every configured cell, tagged with their row.
    pub fn taps(&self) -> &Broadcaster<Tap> {
        &self.taps
    }

    /// Prepares `cell` for `row` and forwards its taps.
    ///
    /// The binding is scoped to the cell's current configuration, so calling
    /// this again on a reused cell replaces the previous binding.
    pub fn configure(&self, cell: &mut ActionCell, row: usize) {
        cell.prepare_for_reuse();
        let taps = self.taps.clone();
        cell.bind(move |message| {
            tracing::info!(row, %message, "cell action");
            taps.send(Tap { row, message });
        });
    }

    /// Releases every subscription the controller holds.
    ///
    /// Returns how many were still active. Pending loads no longer update the rows.
    pub fn teardown(&mut self) -> usize {
        self.observers.cancel_all()
    }
}

impl std::fmt::Debug for CompanyList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyList")
            .field("rows", &self.row_count())
            .field("queue", &self.ui.name())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::catalog::{COMPANIES, MockCompanySource, TAP_MESSAGE};
    use crate::{AwaitError, Config, Immediate};

    fn instant() -> Config {
        Config {
            fetch_delay: Duration::ZERO,
            ..Config::default()
        }
    }

    fn list_with(source: MockCompanySource) -> CompanyList {
        CompanyList::new(Arc::new(source), Immediate::arc())
    }

    #[test]
    fn load_stores_rows_and_fires_reload() {
        let mut list = list_with(MockCompanySource::from_config(&instant(), Immediate::arc()));
        let counts = Arc::new(Mutex::new(Vec::new()));
        let c = counts.clone();
        let _reload = list.reloads().subscribe(move |n| c.lock().push(n));

        list.load();
        assert_eq!(list.rows(), COMPANIES);
        assert_eq!(list.row(2).as_deref(), Some("Microsoft"));
        assert_eq!(*counts.lock(), vec![4]);
        assert_eq!(list.last_error(), None);
    }

    #[tokio::test]
    async fn failed_load_keeps_rows_empty() {
        let mut list = list_with(MockCompanySource::failing(
            &instant(),
            Immediate::arc(),
            "offline",
        ));

        let res = list.load().await;
        assert!(matches!(res, Err(AwaitError::Failed(FetchError::Unavailable { .. }))));
        assert_eq!(list.row_count(), 0);
        assert_eq!(
            list.last_error().map(|e| e.as_label()),
            Some("fetch_unavailable")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_pending_load() {
        let mut list = list_with(MockCompanySource::new(Immediate::arc()));
        let pending = list.load();
        assert_eq!(list.teardown(), 1);

        let _ = pending.await;
        assert_eq!(list.row_count(), 0);
    }

    #[test]
    fn configured_cells_forward_taps_with_row() {
        let list = list_with(MockCompanySource::from_config(&instant(), Immediate::arc()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _taps = list.taps().subscribe(move |t| s.lock().push(t));

        let mut cell = ActionCell::new();
        list.configure(&mut cell, 0);
        list.configure(&mut cell, 3);
        cell.tap();

        assert_eq!(
            *seen.lock(),
            vec![Tap {
                row: 3,
                message: TAP_MESSAGE.to_string()
            }]
        );
    }
}
