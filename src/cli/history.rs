//! History CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{CyclebookError, CyclebookResult};
use crate::reports::{format_history_list, HistoryReport};
use crate::storage::Storage;

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List finalized cycles, newest first
    List,
    /// Show one finalized cycle
    Show {
        /// Position in `history list` (1 is the newest)
        position: usize,
    },
}

/// Handle a history command
pub fn handle_history_command(
    storage: &Storage,
    settings: &Settings,
    cmd: HistoryCommands,
) -> CyclebookResult<()> {
    let state = storage.state();

    match cmd {
        HistoryCommands::List => {
            print!("{}", format_history_list(&state.history));
        }
        HistoryCommands::Show { position } => {
            let record = state
                .history_at(position)
                .ok_or_else(|| CyclebookError::record_not_found(position.to_string()))?;
            print!(
                "{}",
                HistoryReport::generate(record).format_terminal(&settings.date_format)
            );
        }
    }

    Ok(())
}
