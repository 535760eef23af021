//! CSV export
//!
//! Writes the live transactions or the archived cycles to any writer.

use std::io::Write;

use crate::error::CyclebookResult;
use crate::models::{HistoryRecord, Money, Transaction};

fn decimal(amount: Money) -> String {
    format!("{:.2}", amount.to_f64())
}

/// Export transactions, one row each
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> CyclebookResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "ID",
        "Date",
        "Type",
        "Category",
        "Description",
        "Amount",
        "Created At",
    ])?;

    for txn in transactions {
        wtr.write_record([
            txn.id.to_string(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.kind.to_string(),
            txn.category.name().to_string(),
            txn.description.clone(),
            decimal(txn.amount),
            txn.created_at.to_rfc3339(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export archived cycles, one row per record
pub fn export_history_csv<W: Write>(history: &[HistoryRecord], writer: W) -> CyclebookResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "ID",
        "Cycle",
        "Cycle Type",
        "Cycle Start",
        "Starting Budget",
        "Total Income",
        "Total Expenses",
        "Net Flow",
        "Transactions",
    ])?;

    for record in history {
        wtr.write_record([
            record.id.to_string(),
            record.label(),
            record.cycle_type.to_string(),
            record.cycle_start.format("%Y-%m-%d").to_string(),
            decimal(record.starting_budget),
            decimal(record.total_income),
            decimal(record.total_expenses),
            decimal(record.net_flow),
            record.transactions.len().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
