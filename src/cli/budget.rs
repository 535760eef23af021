//! Budget CLI commands
//!
//! Expense budgets and income forecasts for the live cycle.

use clap::Subcommand;

use super::resolve_category;
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::{BudgetRegistry, Category, TransactionType};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show budgets and forecasts for the current cycle
    Show,
    /// Set one or more amounts, e.g. `rent=1500 marketing=250`
    ///
    /// Blank or non-numeric amounts are stored as zero. Nothing is saved if
    /// any amount is negative.
    Set {
        /// CATEGORY=AMOUNT pairs
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &mut Storage, cmd: BudgetCommands) -> CyclebookResult<()> {
    let mut service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Show => {
            print!("{}", format_budgets(service.budgets()));
        }
        BudgetCommands::Set { entries } => {
            let parsed = entries
                .iter()
                .map(|entry| parse_entry(entry))
                .collect::<CyclebookResult<Vec<_>>>()?;

            let budgets = service.save_inputs(parsed)?;
            println!("Budgets saved.");
            println!();
            print!("{}", format_budgets(budgets));
        }
    }

    Ok(())
}

/// Split `CATEGORY=AMOUNT` on the last `=`
fn parse_entry(entry: &str) -> CyclebookResult<(Category, &str)> {
    let (name, amount) = entry.rsplit_once('=').ok_or_else(|| {
        CyclebookError::Validation(format!(
            "Expected CATEGORY=AMOUNT, got '{}'",
            entry
        ))
    })?;
    Ok((resolve_category(name)?, amount))
}

fn format_budgets(budgets: &BudgetRegistry) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:<32} {:>14}\n", "Expense Budgets", ""));
    output.push_str(&"-".repeat(47));
    output.push('\n');
    for category in Category::EXPENSE {
        output.push_str(&format!("{:<32} {:>14}\n", category, budgets.get(*category)));
    }
    output.push_str(&format!(
        "{:<32} {:>14}\n\n",
        "Total",
        budgets.total_for(TransactionType::Expense)
    ));

    output.push_str(&format!("{:<32} {:>14}\n", "Income Forecasts", ""));
    output.push_str(&"-".repeat(47));
    output.push('\n');
    for category in Category::INCOME {
        output.push_str(&format!("{:<32} {:>14}\n", category, budgets.get(*category)));
    }

    output
}
