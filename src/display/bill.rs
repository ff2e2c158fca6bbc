//! Bill display formatting

use chrono::NaiveDate;

use super::truncate;
use crate::config::settings::Preferences;
use crate::models::Bill;

/// Short status text relative to today
pub fn bill_status_label(bill: &Bill, today: NaiveDate) -> String {
    if bill.is_paid() {
        return match bill.paid_on {
            Some(on) => format!("paid {}", on.format("%Y-%m-%d")),
            None => "paid".to_string(),
        };
    }

    match bill.days_until_due(today) {
        d if d < 0 => format!("OVERDUE {}d", -d),
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        d => format!("due in {}d", d),
    }
}

pub fn format_bill_row(bill: &Bill, prefs: &Preferences, today: NaiveDate) -> String {
    format!(
        "{:>8} {} {:20} {:>12}  {}",
        bill.id.to_string(),
        bill.due_date.format("%Y-%m-%d"),
        truncate(&bill.title, 20),
        prefs.money(bill.amount),
        bill_status_label(bill, today)
    )
}

pub fn format_bill_list(bills: &[Bill], prefs: &Preferences, today: NaiveDate) -> String {
    if bills.is_empty() {
        return "No bills found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>8} {:10} {:20} {:>12}  {}\n",
        "ID", "Due", "Title", "Amount", "Status"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for bill in bills {
        output.push_str(&format_bill_row(bill, prefs, today));
        output.push('\n');
    }

    output
}

pub fn format_bill_details(bill: &Bill, prefs: &Preferences, today: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bill:     {}\n", bill.id));
    output.push_str(&format!("Title:    {}\n", bill.title));
    output.push_str(&format!("Due:      {}\n", bill.due_date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:   {}\n", prefs.money(bill.amount)));
    output.push_str(&format!("Status:   {}\n", bill_status_label(bill, today)));

    output
}
