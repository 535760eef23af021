//! Cyclebook - income and expense tracking for small businesses
//!
//! Transactions are recorded against a fixed set of income and expense
//! categories within a weekly, monthly or yearly cycle. Each expense
//! category can carry a budget and each income category a forecast. When a
//! cycle is finalized its figures are archived as a history record and the
//! next cycle starts empty.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, cycles, transactions, budgets, history)
//! - `storage`: Key-value persistence of the ledger state
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Cycle overview and history reports
//! - `display`: Terminal formatting helpers
//! - `export`: CSV export
//! - `cli`: Command handlers for the `cyclebook` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use cyclebook::config::{paths::CyclebookPaths, settings::Settings};
//! use cyclebook::storage::Storage;
//!
//! let paths = CyclebookPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, &settings)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{CyclebookError, CyclebookResult};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence over `default_filter`. Later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("cyclebook=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
