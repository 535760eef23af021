//! Reports module for Cyclebook
//!
//! The live cycle dashboard and views of archived cycles.

pub mod cycle_overview;
pub mod history;

pub use cycle_overview::CycleOverviewReport;
pub use history::{format_history_list, HistoryReport};
