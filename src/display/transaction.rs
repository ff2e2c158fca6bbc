//! Transaction display formatting

use super::truncate;
use crate::config::settings::Preferences;
use crate::models::{Money, Transaction};

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, prefs: &Preferences) -> String {
    format!(
        "{:>8} {} {:14} {:>12}  {}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        truncate(txn.category.as_str(), 14),
        prefs.money(txn.amount),
        txn.description
    )
    .trim_end()
    .to_string()
}

/// Format a list of transactions as a register with a total line
pub fn format_transaction_register(transactions: &[Transaction], prefs: &Preferences) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>8} {:10} {:14} {:>12}  {}\n",
        "ID", "Date", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(62));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, prefs));
        output.push('\n');
    }

    let total: Money = transactions.iter().map(|t| t.amount).sum();
    output.push_str(&"-".repeat(62));
    output.push('\n');
    output.push_str(&format!(
        "{:>34} {:>12}\n",
        format!("Total ({}):", transactions.len()),
        prefs.money(total)
    ));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, prefs: &Preferences) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", prefs.money(txn.amount)));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            txn.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}
