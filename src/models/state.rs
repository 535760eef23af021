//! The ledger state
//!
//! Everything the tracker knows lives in one [`LedgerState`] value, owned by
//! the storage layer and borrowed by the services.

use super::budget::BudgetRegistry;
use super::cycle::{CycleState, CycleType};
use super::history::HistoryRecord;
use super::transaction::TransactionStore;

/// Company name used when none has been set
pub const DEFAULT_COMPANY_NAME: &str = "Company";

/// Complete in-memory state of the tracker
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    pub company_name: String,
    pub cycle: CycleState,
    pub budgets: BudgetRegistry,
    pub transactions: TransactionStore,
    /// Archived cycles, newest first
    pub history: Vec<HistoryRecord>,
}

impl LedgerState {
    /// Fresh state: default company, a cycle of the given type starting today
    pub fn new(cycle_type: CycleType) -> Self {
        Self::with_cycle(CycleState::starting_today(cycle_type))
    }

    pub fn with_cycle(cycle: CycleState) -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            cycle,
            budgets: BudgetRegistry::new(),
            transactions: TransactionStore::new(),
            history: Vec::new(),
        }
    }

    /// Find an archived record by its position in the history list (1 = newest)
    pub fn history_at(&self, position: usize) -> Option<&HistoryRecord> {
        position.checked_sub(1).and_then(|i| self.history.get(i))
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(CycleType::default())
    }
}

/// Normalize a company name, substituting the default for blank input
pub fn normalize_company_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_COMPANY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
