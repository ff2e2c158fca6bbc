use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use student_finance::cli::{
    handle_backup_command, handle_bill_command, handle_budget_command, handle_config_command,
    handle_predict_command, handle_report_command, handle_transaction_command,
};
use student_finance::config::paths::FinancePaths;
use student_finance::storage::Storage;

/// Environment variable holding the log filter (e.g. `debug`, `student_finance=info`)
const LOG_ENV: &str = "FINANCE_LOG";

#[derive(Parser)]
#[command(
    name = "finance",
    version,
    about = "Personal finance tracker for students",
    long_about = "Track expenses, monthly budgets and upcoming bills from the terminal, \
                  and get a forecast of next month's spending. All data lives in one \
                  local JSON file."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(student_finance::cli::TransactionCommands),

    /// Bill tracking commands
    #[command(subcommand)]
    Bill(student_finance::cli::BillCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(student_finance::cli::BudgetCommands),

    /// Predict next month's spending
    Predict(student_finance::cli::PredictArgs),

    /// Spending by category across all history
    Report,

    /// Backup management commands
    #[command(subcommand)]
    Backup(student_finance::cli::BackupCommands),

    /// Show or change configuration
    #[command(subcommand)]
    Config(student_finance::cli::ConfigCommands),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = FinancePaths::new()?;
    let (mut storage, report) = Storage::open(paths)?;

    if let Some(reason) = &report.recovered_error {
        eprintln!("Warning: could not read the data file ({}).", reason);
        eprintln!("Starting with empty data; the old file is backed up on the next change.");
    } else {
        if report.skipped_transactions + report.skipped_bills > 0 {
            eprintln!(
                "Warning: skipped {} transaction(s) and {} bill(s) that could not be read.",
                report.skipped_transactions, report.skipped_bills
            );
        }
        if !report.ignored_sections.is_empty() {
            eprintln!(
                "Warning: ignored unreadable section(s) of the data file: {}.",
                report.ignored_sections.join(", ")
            );
            eprintln!("The old file is backed up on the next change.");
        }
        if report.settings_reset {
            eprintln!("Warning: some settings were invalid and have been reset to defaults.");
        }
    }

    match cli.command {
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&mut storage, cmd)?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&mut storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&mut storage, cmd)?,
        Some(Commands::Predict(args)) => handle_predict_command(&storage, args)?,
        Some(Commands::Report) => handle_report_command(&mut storage)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&mut storage, cmd)?,
        Some(Commands::Config(cmd)) => handle_config_command(&mut storage, cmd)?,
        None => {
            println!("finance - student finance tracker");
            println!();
            println!("Run 'finance --help' for usage information.");
            println!("Start with: finance transaction add 12.50 food");
        }
    }

    Ok(())
}
