//! Export module for Cyclebook
//!
//! CSV export of the live transactions and of the archived cycles.

pub mod csv;

pub use self::csv::{export_history_csv, export_transactions_csv};
