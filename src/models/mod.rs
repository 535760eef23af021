//! Core data models for Cyclebook
//!
//! This module contains the data structures of the tracker: categories,
//! cycles, transactions, budgets, archived history and the ledger state
//! that ties them together.

pub mod budget;
pub mod category;
pub mod cycle;
pub mod history;
pub mod ids;
pub mod money;
pub mod state;
pub mod transaction;

pub use budget::{BudgetRegistry, BudgetValidationError};
pub use category::{Category, CategoryParseError};
pub use cycle::{CycleParseError, CycleState, CycleType};
pub use history::{CategorySummary, HistoryRecord};
pub use ids::{RecordId, TransactionId};
pub use money::Money;
pub use state::LedgerState;
pub use transaction::{
    NewTransaction, Transaction, TransactionStore, TransactionType, TransactionValidationError,
};
