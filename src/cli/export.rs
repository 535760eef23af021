//! Export CLI commands

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

use crate::error::{CyclebookError, CyclebookResult};
use crate::export::{export_history_csv, export_transactions_csv};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the current cycle's transactions as CSV
    Transactions {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export finalized cycles as CSV
    History {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> CyclebookResult<()> {
    let state = storage.state();

    match cmd {
        ExportCommands::Transactions { output } => {
            let transactions = state.transactions.sorted_for_storage();
            match output {
                Some(path) => {
                    export_transactions_csv(&transactions, create(&path)?)?;
                    info!(path = %path.display(), count = transactions.len(), "Exported transactions");
                    println!(
                        "Exported {} transactions to {}",
                        transactions.len(),
                        path.display()
                    );
                }
                None => export_transactions_csv(&transactions, io::stdout().lock())?,
            }
        }
        ExportCommands::History { output } => match output {
            Some(path) => {
                export_history_csv(&state.history, create(&path)?)?;
                info!(path = %path.display(), count = state.history.len(), "Exported history");
                println!(
                    "Exported {} cycles to {}",
                    state.history.len(),
                    path.display()
                );
            }
            None => export_history_csv(&state.history, io::stdout().lock())?,
        },
    }

    Ok(())
}

fn create(path: &Path) -> CyclebookResult<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path).map(BufWriter::new).map_err(|e| {
        CyclebookError::Export(format!("Failed to create {}: {}", path.display(), e))
    })
}
