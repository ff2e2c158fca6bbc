//! Bill CLI commands

use clap::Subcommand;

use crate::display::bill::{format_bill_details, format_bill_list};
use crate::error::FinanceResult;
use crate::models::{parse_date, BillUpdate, NewBill};
use crate::services::bill::parse_bill_id;
use crate::services::BillService;
use crate::storage::Storage;

use super::{parse_amount, today};

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add an upcoming bill
    Add {
        /// What the bill is for
        title: String,
        /// Amount due
        amount: String,
        /// Due date (YYYY-MM-DD)
        due: String,
    },
    /// List bills
    List {
        /// Hide bills that are already paid
        #[arg(short, long)]
        pending: bool,
    },
    /// Show bill details
    Show {
        /// Bill ID (e.g., 2 or bill-2)
        id: String,
    },
    /// Edit a bill
    Edit {
        /// Bill ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New due date
        #[arg(short, long)]
        due: Option<String>,
    },
    /// Mark a bill as paid
    Pay {
        /// Bill ID
        id: String,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        on: Option<String>,
    },
    /// Delete a bill
    Delete {
        /// Bill ID
        id: String,
    },
    /// Show unpaid bills due soon, including overdue ones
    Due {
        /// Look-ahead in days
        #[arg(short, long, default_value = "7")]
        days: u32,
    },
}

/// Handle a bill command
pub fn handle_bill_command(storage: &mut Storage, cmd: BillCommands) -> FinanceResult<()> {
    let prefs = storage.settings.preferences.clone();
    let today = today();
    let mut service = BillService::new(storage);

    match cmd {
        BillCommands::Add { title, amount, due } => {
            let amount = parse_amount(&amount)?;
            let bill = service.add(NewBill::new(title, due, amount))?;
            println!(
                "Added {}: {} {} due {}",
                bill.id,
                bill.title,
                prefs.money(bill.amount),
                bill.due_date.format("%Y-%m-%d")
            );
        }

        BillCommands::List { pending } => {
            let bills = service.list(pending);
            print!("{}", format_bill_list(&bills, &prefs, today));
        }

        BillCommands::Show { id } => {
            let bill = service.find(&id)?;
            print!("{}", format_bill_details(&bill, &prefs, today));
        }

        BillCommands::Edit {
            id,
            title,
            amount,
            due,
        } => {
            let id = parse_bill_id(&id)?;
            let changes = BillUpdate {
                title,
                due_date: due,
                amount: amount.as_deref().map(parse_amount).transpose()?,
            };

            if changes.is_empty() {
                println!("Nothing to change. Use --title, --amount or --due.");
                return Ok(());
            }

            let bill = service.update(id, changes)?;
            println!("Updated {}", bill.id);
            print!("{}", format_bill_details(&bill, &prefs, today));
        }

        BillCommands::Pay { id, on } => {
            let id = parse_bill_id(&id)?;
            let on = match on {
                Some(date) => parse_date(&date)?,
                None => today,
            };
            let bill = service.pay(id, on)?;
            println!(
                "Marked {} ({}) as paid on {}",
                bill.id,
                bill.title,
                on.format("%Y-%m-%d")
            );
        }

        BillCommands::Delete { id } => {
            let id = parse_bill_id(&id)?;
            let bill = service.delete(id)?;
            println!("Deleted {}: {}", bill.id, bill.title);
        }

        BillCommands::Due { days } => {
            let due = service.due_within(today, days);
            if due.is_empty() {
                println!("No unpaid bills due in the next {} day(s).", days);
            } else {
                println!("Bills due within {} day(s):", days);
                print!("{}", format_bill_list(&due, &prefs, today));
            }
        }
    }

    Ok(())
}
