//! Budget CLI commands

use chrono::Datelike;
use clap::Subcommand;

use crate::display::report::format_budget_summary;
use crate::error::FinanceResult;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_amount, parse_month, today};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly limit, or a category limit with --category
    Set {
        /// Limit amount
        amount: String,
        /// Category the limit applies to
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove the monthly limit, or a category limit with --category
    Clear {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show spending against the budget for a month
    Status {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &mut Storage, cmd: BudgetCommands) -> FinanceResult<()> {
    let prefs = storage.settings.preferences.clone();
    let mut service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set { amount, category } => {
            let amount = parse_amount(&amount)?;
            match category {
                Some(category) => {
                    let category = service.set_category_limit(&category, amount)?;
                    println!("Limit for '{}' set to {}", category, prefs.money(amount));
                }
                None => {
                    service.set_monthly_limit(amount)?;
                    println!("Monthly limit set to {}", prefs.money(amount));
                }
            }
        }

        BudgetCommands::Clear { category } => match category {
            Some(category) => {
                let old = service.clear_category_limit(&category)?;
                println!(
                    "Removed limit for '{}' (was {})",
                    category.trim().to_lowercase(),
                    prefs.money(old)
                );
            }
            None => {
                service.clear_monthly_limit()?;
                println!("Monthly limit removed");
            }
        },

        BudgetCommands::Status { month } => {
            let (year, month) = match month {
                Some(m) => parse_month(&m)?,
                None => {
                    let now = today();
                    (now.year(), now.month())
                }
            };

            let summary = service.month_summary(year, month)?;
            let label = format!("{}-{:02}", year, month);
            print!("{}", format_budget_summary(&summary, &label, &prefs));
        }
    }

    Ok(())
}
