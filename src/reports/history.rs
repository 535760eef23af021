//! Archived cycle reports

use crate::display::report::{format_signed, separator, truncate};
use crate::display::transaction::format_transaction_register;
use crate::models::{Category, CategorySummary, HistoryRecord};

const WIDTH: usize = 80;

/// Report for one archived cycle
#[derive(Debug, Clone)]
pub struct HistoryReport<'a> {
    record: &'a HistoryRecord,
    entries: Vec<(Category, CategorySummary)>,
}

impl<'a> HistoryReport<'a> {
    pub fn generate(record: &'a HistoryRecord) -> Self {
        Self {
            record,
            entries: record.summary_by_amount(),
        }
    }

    /// Category summary, largest amount first
    pub fn entries(&self) -> &[(Category, CategorySummary)] {
        &self.entries
    }

    /// Format for terminal display
    pub fn format_terminal(&self, date_format: &str) -> String {
        let record = self.record;
        let mut output = String::new();

        output.push_str(&format!("{} ({})\n", record.label(), record.cycle_type));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output.push_str(&format!("{:<20} {:>14}\n", "Starting Budget:", record.starting_budget));
        output.push_str(&format!("{:<20} {:>14}\n", "Income:", record.total_income));
        output.push_str(&format!("{:<20} {:>14}\n", "Expenses:", record.total_expenses));
        output.push_str(&format!("{:<20} {:>14}\n", "Net Flow:", record.net_flow));
        if let Some(archived_at) = record.archived_at {
            output.push_str(&format!(
                "{:<20} {:>14}\n",
                "Archived:",
                archived_at.format(date_format).to_string()
            ));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:<32} {:>14} {:>14} {:>14}\n",
            "Category", "Actual", "Target", "Variance"
        ));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        for (category, summary) in &self.entries {
            output.push_str(&format!(
                "{:<32} {:>14} {:>14} {:>14} {}\n",
                category,
                summary.actual(),
                summary.target(),
                format_signed(summary.variance()),
                summary.verdict()
            ));
        }
        output.push('\n');

        output.push_str(&format!("Transactions ({})\n", record.transactions.len()));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        output.push_str(&format_transaction_register(&record.transactions, date_format));

        output
    }
}

/// One line per archived cycle, newest first, numbered from 1
pub fn format_history_list(history: &[HistoryRecord]) -> String {
    if history.is_empty() {
        return "No finalized cycles yet.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<30} {:>14} {:>14} {:>14}\n",
        "#", "Cycle", "Income", "Expenses", "Net Flow"
    ));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    for (index, record) in history.iter().enumerate() {
        let marker = if record.is_deficit() { " (deficit)" } else { "" };
        output.push_str(&format!(
            "{:>3}  {:<30} {:>14} {:>14} {:>14}{}\n",
            index + 1,
            truncate(&record.label(), 30),
            record.total_income,
            record.total_expenses,
            record.net_flow,
            marker
        ));
    }

    output
}
