//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod cycle;
pub mod export;
pub mod history;
pub mod settings;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use cycle::{handle_cycle_command, CycleCommands};
pub use export::{handle_export_command, ExportCommands};
pub use history::{handle_history_command, HistoryCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::error::{CyclebookError, CyclebookResult};
use crate::models::Category;
use crate::services::{AssumeYes, Confirm};

/// Asks on stdout and reads the answer from stdin
///
/// Only `y` or `yes` (any case) counts as yes. A closed stdin is a no.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// `--yes` skips the question, otherwise ask on the terminal
pub fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(input: &str) -> CyclebookResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CyclebookError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", input))
    })
}

/// Resolve a category argument by exact name or unambiguous prefix
pub fn resolve_category(input: &str) -> CyclebookResult<Category> {
    Category::resolve(input).map_err(|e| CyclebookError::Validation(e.to_string()))
}
