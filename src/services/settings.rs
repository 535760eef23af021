//! Settings service
//!
//! Company name and cycle type. Changing the cycle type invalidates the live
//! cycle, so the user is offered a restart from today.

use serde::Serialize;
use tracing::info;

use super::confirm::Confirm;
use crate::audit::EntityType;
use crate::error::CyclebookResult;
use crate::models::cycle::today;
use crate::models::state::normalize_company_name;
use crate::models::{CycleType, LedgerState};
use crate::storage::Storage;

/// What `save_settings` changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsChange {
    pub company_renamed: bool,
    pub cycle_type_changed: bool,
    /// The cycle was restarted today and live transactions were discarded
    pub cycle_reset: bool,
}

impl SettingsChange {
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Serialize)]
struct SettingsSnapshot<'s> {
    company_name: &'s str,
    cycle_type: CycleType,
    cycle_start: chrono::NaiveDate,
    transactions: usize,
}

impl<'s> SettingsSnapshot<'s> {
    fn of(state: &'s LedgerState) -> Self {
        Self {
            company_name: &state.company_name,
            cycle_type: state.cycle.cycle_type,
            cycle_start: state.cycle.cycle_start,
            transactions: state.transactions.len(),
        }
    }
}

/// Service for ledger-level settings
pub struct SettingsService<'a> {
    storage: &'a mut Storage,
}

impl<'a> SettingsService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn company_name(&self) -> &str {
        &self.storage.state().company_name
    }

    pub fn cycle_type(&self) -> CycleType {
        self.storage.state().cycle.cycle_type
    }

    /// Store the company name and cycle type
    ///
    /// A blank name becomes "Company". When the cycle type changes the new
    /// type is kept regardless; `confirm` then decides whether the cycle
    /// restarts today, which also discards the live transactions. Budgets
    /// and history are never touched.
    pub fn save_settings(
        &mut self,
        company_name: &str,
        cycle_type: CycleType,
        confirm: &mut dyn Confirm,
    ) -> CyclebookResult<SettingsChange> {
        let before = self.storage.state().clone();
        let company_name = normalize_company_name(company_name);

        let mut change = SettingsChange {
            company_renamed: company_name != before.company_name,
            cycle_type_changed: cycle_type != before.cycle.cycle_type,
            cycle_reset: false,
        };

        if change.cycle_type_changed {
            let prompt = format!(
                "Changing the cycle type to '{}' makes the current cycle invalid. Reset the cycle start date to today?",
                cycle_type
            );
            change.cycle_reset = confirm.confirm(&prompt);
        }

        if change.is_unchanged() {
            return Ok(change);
        }

        let state = self.storage.state_mut();
        state.company_name = company_name;
        state.cycle.cycle_type = cycle_type;
        if change.cycle_reset {
            state.cycle.cycle_start = today();
            state.transactions.clear();
        }

        self.storage.save()?;

        info!(
            company = %self.storage.state().company_name,
            cycle_type = %cycle_type,
            reset = change.cycle_reset,
            "Saved settings"
        );
        self.storage.log_update(
            EntityType::Settings,
            "settings",
            None,
            &SettingsSnapshot::of(&before),
            &SettingsSnapshot::of(self.storage.state()),
        );

        Ok(change)
    }

    /// Rename the company, keeping the cycle type
    pub fn set_company_name(&mut self, company_name: &str) -> CyclebookResult<SettingsChange> {
        let cycle_type = self.cycle_type();
        // Same cycle type, so no question is asked
        self.save_settings(company_name, cycle_type, &mut super::confirm::AssumeNo)
    }
}
