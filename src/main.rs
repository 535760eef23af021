use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cyclebook::audit::AuditLogger;
use cyclebook::cli::{
    handle_budget_command, handle_cycle_command, handle_export_command, handle_history_command,
    handle_settings_command, handle_transaction_command,
};
use cyclebook::config::{paths::CyclebookPaths, settings::Settings};
use cyclebook::display::format_category_tree;
use cyclebook::reports::CycleOverviewReport;
use cyclebook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cyclebook",
    version,
    about = "Income and expense tracking for small businesses",
    long_about = "Cyclebook records income and expenses against fixed categories, \
                  compares them with per-category budgets and forecasts, and archives \
                  each weekly, monthly or yearly cycle when it is finalized."
)]
struct Cli {
    /// Data directory (overrides CYCLEBOOK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard for the current cycle
    Status,

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(cyclebook::cli::TransactionCommands),

    /// Budget and forecast commands
    #[command(subcommand)]
    Budget(cyclebook::cli::BudgetCommands),

    /// Cycle lifecycle commands
    #[command(subcommand)]
    Cycle(cyclebook::cli::CycleCommands),

    /// Finalized cycles
    #[command(subcommand)]
    History(cyclebook::cli::HistoryCommands),

    /// Export data as CSV
    #[command(subcommand)]
    Export(cyclebook::cli::ExportCommands),

    /// Company name and cycle type
    #[command(subcommand)]
    Settings(cyclebook::cli::SettingsCommands),

    /// List income and expense categories
    Categories,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => CyclebookPaths::with_base_dir(dir),
        None => CyclebookPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    if !paths.settings_file().exists() {
        settings.save(&paths)?;
    }
    cyclebook::init_tracing(&settings.log_filter);

    // Initialize storage
    let mut storage = Storage::open(paths.clone(), &settings)?;

    match cli.command {
        None | Some(Commands::Status) => {
            print!(
                "{}",
                CycleOverviewReport::generate(storage.state()).format_terminal()
            );
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&mut storage, cmd)?;
        }
        Some(Commands::Cycle(cmd)) => {
            handle_cycle_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::History(cmd)) => {
            handle_history_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Settings(cmd)) => {
            handle_settings_command(&mut storage, cmd)?;
        }
        Some(Commands::Categories) => {
            print!("{}", format_category_tree(&storage.state().budgets));
        }
        Some(Commands::Audit { count }) => {
            let logger = AuditLogger::new(paths.audit_log());
            let entries = logger.read_recent(count)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config) => {
            println!("Cyclebook Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Ledger file:      {}", paths.ledger_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Exports:          {}", paths.exports_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Default cycle type: {}", settings.default_cycle_type);
            println!("  Date format:        {}", settings.date_format);
            println!("  Audit enabled:      {}", settings.audit_enabled);
            println!("  Log filter:         {}", settings.log_filter);
        }
    }

    Ok(())
}
