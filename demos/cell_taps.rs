//! # Example: cell_taps
//!
//! Replaces a delegate callback with a per-cell broadcaster.
//!
//! Shows how to:
//! - Configure reusable [`ActionCell`]s through [`CompanyList::configure`].
//! - Observe every tap, tagged with its row, on [`CompanyList::taps`].
//! - Reuse a cell without piling up observers.
//!
//! ## Flow
//! ```text
//! configure(cell, row)
//!   ├─► cell.prepare_for_reuse()   (old bindings released)
//!   └─► cell.bind(|msg| taps.send(Tap { row, msg }))
//!
//! cell.tap() ──► action.send("Button is tapped!!!!!") ──► taps observers
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example cell_taps
//! ```

use std::sync::Arc;
use std::time::Duration;

use relaykit::{ActionCell, CompanyList, Config, Immediate, MockCompanySource};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config {
        fetch_delay: Duration::ZERO,
        ..Config::default()
    };
    let mut list = CompanyList::new(
        Arc::new(MockCompanySource::from_config(&cfg, Immediate::arc())),
        Immediate::arc(),
    );
    let _ = list.load();

    let _taps = list.taps().subscribe(|tap| {
        println!("[taps] row {} sent {:?}", tap.row, tap.message);
    });

    // Two visible cells, reused while "scrolling" through all rows
    let mut cells = [ActionCell::new(), ActionCell::new()];
    for row in 0..list.row_count() {
        let cell = &mut cells[row % 2];
        list.configure(cell, row);
        cell.tap();
    }

    for (i, cell) in cells.iter().enumerate() {
        println!(
            "[cell {i}] observers={} reuses={}",
            cell.observer_count(),
            cell.reuse_count()
        );
    }
    Ok(())
}
