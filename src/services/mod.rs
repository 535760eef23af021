//! Service layer for Cyclebook
//!
//! Services borrow the [`Storage`](crate::storage::Storage), apply one
//! change to the ledger state, save it and record an audit entry.

pub mod budget;
pub mod confirm;
pub mod cycle;
pub mod settings;
pub mod summary;
pub mod transaction;

pub use budget::BudgetService;
pub use confirm::{AssumeNo, AssumeYes, Confirm};
pub use cycle::{CycleService, FinalizeOutcome};
pub use settings::{SettingsChange, SettingsService};
pub use summary::{BudgetProgress, CategoryBreakdown, IncomeBreakdown, SummaryService, Totals};
pub use transaction::{TransactionFilter, TransactionService};
