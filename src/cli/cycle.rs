//! Cycle CLI commands

use clap::Subcommand;

use super::{confirmer, parse_date};
use crate::config::settings::Settings;
use crate::error::CyclebookResult;
use crate::services::{CycleService, FinalizeOutcome};
use crate::storage::Storage;

/// Cycle subcommands
#[derive(Subcommand)]
pub enum CycleCommands {
    /// Archive the current cycle and start the next one
    Finalize {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move the start date of the current cycle
    SetStart {
        /// New start date (YYYY-MM-DD)
        date: String,
    },
    /// Show when the current cycle ends and the following ones start
    Next {
        /// Number of upcoming cycles to list
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },
}

/// Handle a cycle command
pub fn handle_cycle_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: CycleCommands,
) -> CyclebookResult<()> {
    let date_format = settings.date_format.as_str();
    let mut service = CycleService::new(storage);

    match cmd {
        CycleCommands::Finalize { yes } => {
            let mut confirm = confirmer(yes);
            match service.finalize(&mut *confirm)? {
                FinalizeOutcome::Declined => println!("Finalize cancelled."),
                FinalizeOutcome::Finalized(record) => {
                    println!("Finalized {}.", record.label());
                    println!("  Income:   {}", record.total_income);
                    println!("  Expenses: {}", record.total_expenses);
                    println!("  Net Flow: {}", record.net_flow);
                    println!();
                    println!("Current cycle: {}", service.current_label());
                }
            }
        }

        CycleCommands::SetStart { date } => {
            let date = parse_date(&date)?;
            if service.set_cycle_start(date)? {
                println!("Cycle start set to {}.", date.format(date_format));
            } else {
                println!("Cycle already starts on {}.", date.format(date_format));
            }
            println!("Current cycle: {}", service.current_label());
        }

        CycleCommands::Next { count } => {
            let cycle = service.cycle();
            println!("Current cycle: {}", cycle.label());
            println!("  Starts: {}", cycle.cycle_start.format(date_format));
            println!("  Ends:   {}", cycle.end_date().format(date_format));
            println!();

            let cycle_type = cycle.cycle_type;
            for step in 1..=count.max(1) {
                let start = cycle_type.advance(cycle.cycle_start, step);
                println!(
                    "{:>3}. {:<28} starts {}",
                    step,
                    cycle_type.label(start),
                    start.format(date_format)
                );
            }
        }
    }

    Ok(())
}
