//! # Example: company_list
//!
//! Loads the company list from the mock API and receives it on the main queue.
//!
//! Demonstrates how to:
//! - Inject a [`CompanySource`](relaykit::CompanySource) into a [`CompanyList`].
//! - Deliver the fetched rows on a designated [`SerialQueue`].
//! - Await the delivered promise and react to reloads.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► SerialQueue::from_config ("main")
//!   ├─► CompanyList::load()
//!   │     ├─► MockCompanySource::fetch_companies() (3s simulated latency)
//!   │     ├─► deliver_on(main)
//!   │     └─► on_value: store rows, reloads.send(4)
//!   ├─► await delivered promise
//!   └─► main.shutdown()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example company_list
//! ```

use std::sync::Arc;

use relaykit::{CompanyList, Config, MockCompanySource, Scheduler, SerialQueue};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Designated queue and mock API, both from the default config
    let cfg = Config::default();
    let main_queue = SerialQueue::from_config(&cfg);
    let source = MockCompanySource::from_config(&cfg, main_queue.clone());

    // 2. Controller with an injected source
    let mut list = CompanyList::new(Arc::new(source), main_queue.clone());
    let _reloads = list
        .reloads()
        .subscribe(|rows| println!("[list] reloaded with {rows} rows"));

    // 3. Load and wait for the rows
    println!("[list] fetching...");
    let rows = list.load().await?;
    for (i, name) in rows.iter().enumerate() {
        println!("  {i}: {name}");
    }

    // 4. Release everything
    list.teardown();
    main_queue.shutdown().await;
    Ok(())
}
