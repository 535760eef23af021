//! Transaction CLI commands
//!
//! Implements CLI commands for the live cycle's transactions.

use clap::Subcommand;

use super::{confirmer, parse_date, resolve_category};
use crate::config::settings::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::cycle::today;
use crate::models::{Money, NewTransaction, TransactionType};
use crate::services::{Confirm, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record income or an expense
    Add {
        /// income or expense
        kind: String,
        /// Amount (e.g., "150.00")
        amount: String,
        /// Category name or unambiguous prefix (e.g., "rent")
        category: String,
        /// Description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List the live cycle's transactions grouped by date
    List {
        /// Only income or only expenses
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_kind(input: &str) -> CyclebookResult<TransactionType> {
    input
        .parse::<TransactionType>()
        .map_err(|e| CyclebookError::Validation(e.to_string()))
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> CyclebookResult<()> {
    let date_format = settings.date_format.as_str();

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            description,
            date,
        } => {
            let kind = parse_kind(&kind)?;

            let amount = Money::parse(&amount).map_err(|e| {
                CyclebookError::Validation(format!(
                    "Invalid amount format: '{}'. Use format like '150.00'. Error: {}",
                    amount, e
                ))
            })?;

            let category = resolve_category(&category)?;

            let date = match date {
                Some(date_str) => parse_date(&date_str)?,
                None => today(),
            };

            let input = NewTransaction::new(kind, description.join(" "), amount, category, date);
            let txn = TransactionService::new(storage).add(input)?;

            println!("Recorded {}:", txn.kind);
            println!("  ID:          {}", txn.id);
            println!("  Date:        {}", txn.date.format(date_format));
            println!("  Amount:      {}", txn.amount);
            println!("  Category:    {}", txn.category);
            println!("  Description: {}", txn.description);

            let cycle = storage.state().cycle;
            if !cycle.contains(txn.date) {
                println!();
                println!(
                    "Note: {} is outside the current cycle ({}).",
                    txn.date.format(date_format),
                    cycle.label()
                );
            }
        }

        TransactionCommands::List { kind, limit } => {
            let mut filter = TransactionFilter::new();
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let transactions = TransactionService::new(storage).list(filter);
            print!("{}", format_transaction_register(&transactions, date_format));
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let service = TransactionService::new(storage);
            let txn = service.find(&id)?;
            print!("{}", format_transaction_details(txn, date_format));
        }

        TransactionCommands::Delete { id, yes } => {
            let mut service = TransactionService::new(storage);
            let txn = service.find(&id)?.clone();

            let prompt = format!(
                "Delete {} '{}' ({}, {})?",
                txn.kind,
                txn.description,
                txn.amount,
                txn.date.format(date_format)
            );
            if !confirmer(yes).confirm(&prompt) {
                println!("Deletion cancelled.");
                return Ok(());
            }

            let removed = service.delete(txn.id)?;
            println!("Deleted transaction {}", removed.id);
        }
    }

    Ok(())
}
