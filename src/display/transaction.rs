//! Transaction display formatting
//!
//! The register groups transactions under a date heading, newest date
//! first.

use chrono::NaiveDate;

use super::report::truncate;
use crate::models::{Transaction, TransactionType};

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction) -> String {
    let sign = match txn.kind {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };

    format!(
        "  {:<12} {:<28} {:<30} {}{:>13}",
        txn.id.to_string(),
        truncate(&txn.description, 28),
        truncate(txn.category.name(), 30),
        sign,
        txn.amount
    )
}

/// Format transactions as a register grouped by date
///
/// `date_format` is a strftime pattern for the group headings.
pub fn format_transaction_register(transactions: &[Transaction], date_format: &str) -> String {
    if transactions.is_empty() {
        return "No transactions recorded for this cycle.\n".to_string();
    }

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

    let mut output = String::new();
    let mut current: Option<NaiveDate> = None;

    for txn in sorted {
        if current != Some(txn.date) {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("{}\n", txn.date.format(date_format)));
            current = Some(txn.date);
        }
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format(date_format)));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!(
        "Recorded:    {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, NewTransaction, TransactionStore};

    fn store() -> TransactionStore {
        let mut store = TransactionStore::new();
        for (day, kind, category, desc) in [
            (3, TransactionType::Expense, Category::Marketing, "Flyers"),
            (5, TransactionType::Income, Category::SalesRevenue, "Invoice"),
            (3, TransactionType::Expense, Category::RentLease, "Rent"),
        ] {
            store
                .add(NewTransaction::new(
                    kind,
                    desc,
                    Money::from_cents(1000),
                    category,
                    NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                ))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_empty_register() {
        assert!(format_transaction_register(&[], "%Y-%m-%d").contains("No transactions"));
    }

    #[test]
    fn test_register_groups_by_date() {
        let store = store();
        let output = format_transaction_register(store.as_slice(), "%Y-%m-%d");

        let newer = output.find("2024-01-05").unwrap();
        let older = output.find("2024-01-03").unwrap();
        assert!(newer < older);
        assert_eq!(output.matches("2024-01-03").count(), 1);
        assert!(output.contains("Invoice"));
        assert!(output.contains(&format!("+{:>13}", "₱10.00")));
    }

    #[test]
    fn test_details() {
        let store = store();
        let details = format_transaction_details(&store.as_slice()[0], "%d/%m/%Y");
        assert!(details.contains("Date:        03/01/2024"));
        assert!(details.contains("Category:    Rent / Lease"));
        assert!(details.contains("Type:        expense"));
    }
}
