//! Cycle service
//!
//! Finalizes the live cycle into an archived [`HistoryRecord`] and manages
//! the cycle start date.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::confirm::Confirm;
use super::summary::SummaryService;
use crate::audit::EntityType;
use crate::error::CyclebookResult;
use crate::models::{CategorySummary, CycleState, HistoryRecord, RecordId};
use crate::storage::Storage;

/// Result of a finalize request
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeOutcome {
    /// The user declined; nothing changed
    Declined,
    /// The cycle was archived and the next one started
    Finalized(HistoryRecord),
}

/// Service for the cycle lifecycle
pub struct CycleService<'a> {
    storage: &'a mut Storage,
}

impl<'a> CycleService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn cycle(&self) -> CycleState {
        self.storage.state().cycle
    }

    /// Display label of the live cycle
    pub fn current_label(&self) -> String {
        self.cycle().label()
    }

    /// Start date the next cycle will get on finalize
    pub fn next_start(&self) -> NaiveDate {
        self.cycle().next_start()
    }

    /// Prompt shown before finalizing
    pub fn finalize_prompt(&self) -> String {
        let cycle = self.cycle();
        format!(
            "Finalize cycle starting {}? This archives all current data and starts the next {} cycle.",
            cycle.cycle_start.format("%Y-%m-%d"),
            cycle.cycle_type
        )
    }

    /// Archive the live cycle and start the next one
    ///
    /// After confirmation the record is built from the current figures,
    /// prepended to history, the start date advances one cycle and the live
    /// budgets and transactions are cleared. The state is saved once at the
    /// end.
    pub fn finalize(&mut self, confirm: &mut dyn Confirm) -> CyclebookResult<FinalizeOutcome> {
        if !confirm.confirm(&self.finalize_prompt()) {
            return Ok(FinalizeOutcome::Declined);
        }

        let record = self.build_record();

        let state = self.storage.state_mut();
        state.history.insert(0, record.clone());
        let next_start = state.cycle.advance();
        state.budgets.clear();
        state.transactions.clear();

        self.storage.save()?;

        info!(
            record = %record.id,
            label = %record.label(),
            net_flow = %record.net_flow,
            %next_start,
            "Finalized cycle"
        );
        self.storage.log_archive(&record);

        Ok(FinalizeOutcome::Finalized(record))
    }

    fn build_record(&self) -> HistoryRecord {
        let state = self.storage.state();
        let summary = SummaryService::new(state);
        let totals = summary.totals();

        let mut category_summary = BTreeMap::new();
        for item in summary.category_breakdown() {
            category_summary.insert(
                item.category,
                CategorySummary::expense(item.budget, item.amount_spent),
            );
        }
        for item in summary.income_breakdown() {
            category_summary.insert(
                item.category,
                CategorySummary::income(item.forecast, item.actual),
            );
        }

        HistoryRecord {
            id: RecordId::new(),
            cycle_start: state.cycle.cycle_start,
            cycle_type: state.cycle.cycle_type,
            starting_budget: totals.total_budget,
            total_income: totals.total_income,
            total_expenses: totals.total_expenses,
            net_flow: totals.net_flow,
            category_summary,
            transactions: state.transactions.as_slice().to_vec(),
            archived_at: Some(Utc::now()),
        }
    }

    /// Override the live cycle start date
    ///
    /// Returns `false` when the date is already the start date.
    pub fn set_cycle_start(&mut self, date: NaiveDate) -> CyclebookResult<bool> {
        let before = self.cycle();
        if before.cycle_start == date {
            return Ok(false);
        }

        self.storage.state_mut().cycle.cycle_start = date;
        self.storage.save()?;

        info!(from = %before.cycle_start, to = %date, "Cycle start changed");
        self.storage.log_update(
            EntityType::Cycle,
            "cycle",
            Some(self.current_label()),
            &serde_json::json!({ "cycleStart": before.cycle_start }),
            &serde_json::json!({ "cycleStart": date }),
        );

        Ok(true)
    }
}
