//! Settings CLI commands
//!
//! Company name and cycle type are part of the ledger; the rest lives in
//! `config.json` and is shown by `cyclebook config`.

use clap::Subcommand;

use super::confirmer;
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::CycleType;
use crate::services::SettingsService;
use crate::storage::Storage;

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the company name and cycle type
    Show,
    /// Change the company name or cycle type
    Set {
        /// Company name (blank resets to "Company")
        #[arg(short, long)]
        company: Option<String>,
        /// Cycle type: weekly, monthly or yearly
        #[arg(short = 'C', long)]
        cycle: Option<String>,
        /// Restart the cycle today without asking when the cycle type changes
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle a settings command
pub fn handle_settings_command(storage: &mut Storage, cmd: SettingsCommands) -> CyclebookResult<()> {
    match cmd {
        SettingsCommands::Show => {
            let state = storage.state();
            println!("Company:     {}", state.company_name);
            println!(
                "Cycle type:  {} ({})",
                state.cycle.cycle_type,
                state.cycle.cycle_type.description()
            );
            println!("Cycle start: {}", state.cycle.cycle_start.format("%Y-%m-%d"));
            println!("Current:     {}", state.cycle.label());
        }

        SettingsCommands::Set {
            company,
            cycle,
            yes,
        } => {
            let mut service = SettingsService::new(storage);

            let company = company.unwrap_or_else(|| service.company_name().to_string());
            let cycle_type = match cycle {
                Some(raw) => raw
                    .parse::<CycleType>()
                    .map_err(|e| CyclebookError::Validation(e.to_string()))?,
                None => service.cycle_type(),
            };

            let mut confirm = confirmer(yes);
            let change = service.save_settings(&company, cycle_type, &mut *confirm)?;

            if change.is_unchanged() {
                println!("Settings unchanged.");
                return Ok(());
            }
            if change.company_renamed {
                println!("Company name set to '{}'.", service.company_name());
            }
            if change.cycle_type_changed {
                println!("Cycle type set to {}.", service.cycle_type());
            }
            if change.cycle_reset {
                println!("Cycle restarted today; current transactions were cleared.");
            } else if change.cycle_type_changed {
                println!("Cycle start date kept.");
            }
        }
    }

    Ok(())
}
