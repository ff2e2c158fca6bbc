//! Transaction CLI commands

use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, NewTransaction, TransactionUpdate, SUGGESTED_CATEGORIES};
use crate::services::transaction::parse_transaction_id;
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{parse_amount, parse_month, today_string};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new expense
    #[command(after_help = suggested_categories_help())]
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// Category tag (e.g., food, rent)
        category: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List transactions
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Only this month (YYYY-MM)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Show only the most recent N transactions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (e.g., 3 or txn-3)
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

fn suggested_categories_help() -> String {
    format!("Suggested categories: {}", SUGGESTED_CATEGORIES.join(", "))
}

/// Handle a transaction command
pub fn handle_transaction_command(storage: &mut Storage, cmd: TransactionCommands) -> FinanceResult<()> {
    let prefs = storage.settings.preferences.clone();
    let mut service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let amount = parse_amount(&amount)?;
            let date = date.unwrap_or_else(today_string);

            let mut input = NewTransaction::new(amount, category, date);
            if let Some(description) = description {
                input = input.description(description);
            }

            let txn = service.add(input)?;
            println!(
                "Recorded {}: {} on {} ({})",
                txn.id,
                prefs.money(txn.amount),
                txn.date.format("%Y-%m-%d"),
                txn.category
            );
        }

        TransactionCommands::List {
            category,
            month,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new();

            if let Some(category) = category {
                filter = filter.category(Category::new(&category)?);
            }
            if let Some(month) = month {
                let (year, month) = parse_month(&month)?;
                filter = filter.month(year, month)?;
            }
            if let Some(from) = from {
                filter.start_date = Some(crate::models::parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(crate::models::parse_date(&to)?);
            }
            if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
                if start > end {
                    return Err(FinanceError::Validation(
                        "--from must not be after --to".into(),
                    ));
                }
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let transactions = service.list(&filter);
            print!("{}", format_transaction_register(&transactions, &prefs));
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(&id)?;
            print!("{}", format_transaction_details(&txn, &prefs));
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            date,
            description,
        } => {
            let id = parse_transaction_id(&id)?;
            let changes = TransactionUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                date,
                description,
            };

            if changes.is_empty() {
                println!("Nothing to change. Use --amount, --category, --date or --description.");
                return Ok(());
            }

            let txn = service.update(id, changes)?;
            println!("Updated {}", txn.id);
            print!("{}", format_transaction_details(&txn, &prefs));
        }

        TransactionCommands::Delete { id } => {
            let id = parse_transaction_id(&id)?;
            let txn = service.delete(id)?;
            println!(
                "Deleted {}: {} on {} ({})",
                txn.id,
                prefs.money(txn.amount),
                txn.date.format("%Y-%m-%d"),
                txn.category
            );
        }
    }

    Ok(())
}
