//! Configuration commands

use clap::{Subcommand, ValueEnum};
use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::services::PredictionStrategy;
use crate::storage::Storage;

/// Preference keys that `config set` accepts
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigKey {
    /// Symbol printed in front of amounts
    Currency,
    /// Default prediction strategy (average or linear)
    Strategy,
    /// Months averaged by the average strategy
    Window,
    /// Number of data file backups to keep
    Backups,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths, record counts and preferences
    Show,
    /// Change a preference
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        value: String,
    },
}

/// Handle a config command
pub fn handle_config_command(storage: &mut Storage, cmd: ConfigCommands) -> FinanceResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let prefs = &storage.settings.preferences;
            let budget = &storage.settings.budget;

            println!("Student Finance Tracker v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Paths:");
            println!("  Base:     {}", storage.paths().base_dir().display());
            println!("  Data:     {}", storage.paths().data_file().display());
            println!("  Backups:  {}", storage.paths().backup_dir().display());
            println!();
            println!("Records:");
            println!("  Transactions: {}", storage.transactions.len());
            println!("  Bills:        {}", storage.bills.len());
            println!();
            println!("Preferences:");
            println!("  currency: {}", prefs.currency_symbol);
            println!("  strategy: {}", prefs.prediction_strategy);
            println!("  window:   {}", prefs.average_window);
            println!("  backups:  {}", prefs.backup_count);
            println!();
            println!("Budget:");
            if budget.has_limit() {
                println!("  Monthly limit: {}", prefs.money(budget.monthly_limit));
            } else {
                println!("  Monthly limit: (none)");
            }
            for (category, limit) in &budget.category_limits {
                println!("  {}: {}", category, prefs.money(*limit));
            }
        }

        ConfigCommands::Set { key, value } => {
            storage.commit(|s| apply_preference(&mut s.settings.preferences, key, &value))?;
            info!(?key, %value, "preference changed");
            println!("Set {:?} to {}", key, value.trim());
        }
    }

    Ok(())
}

fn apply_preference(
    prefs: &mut crate::config::settings::Preferences,
    key: ConfigKey,
    value: &str,
) -> FinanceResult<()> {
    let value = value.trim();
    match key {
        ConfigKey::Currency => prefs.set_currency_symbol(value)?,
        ConfigKey::Strategy => prefs.prediction_strategy = value.parse::<PredictionStrategy>()?,
        ConfigKey::Window => prefs.set_average_window(parse_count(value)?)?,
        ConfigKey::Backups => prefs.set_backup_count(parse_count(value)?)?,
    }
    Ok(())
}

fn parse_count(value: &str) -> FinanceResult<usize> {
    value
        .parse()
        .map_err(|_| FinanceError::Validation(format!("Expected a whole number, got '{}'", value)))
}
