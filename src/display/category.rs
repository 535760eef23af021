//! Category display formatting

use crate::models::{BudgetRegistry, Category, TransactionType};

/// Format the category registry as a tree, one branch per transaction type
///
/// Each category shows its budget (or forecast, for income) when one is set.
pub fn format_category_tree(budgets: &BudgetRegistry) -> String {
    let mut output = String::new();

    for (i, kind) in [TransactionType::Income, TransactionType::Expense]
        .into_iter()
        .enumerate()
    {
        let heading = match kind {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expenses",
        };
        output.push_str(&format!("{}\n", heading));

        let categories = Category::for_kind(kind);
        for (j, category) in categories.iter().enumerate() {
            let is_last = j == categories.len() - 1;
            let prefix = if is_last { "└── " } else { "├── " };

            let target = if budgets.contains(*category) {
                let label = if category.is_income() { "forecast" } else { "budget" };
                format!(" ({}: {})", label, budgets.get(*category))
            } else {
                String::new()
            };

            output.push_str(&format!("  {}{}{}\n", prefix, category, target));
        }

        if i == 0 {
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_tree_lists_every_category() {
        let output = format_category_tree(&BudgetRegistry::default());
        for category in Category::ALL {
            assert!(output.contains(category.name()));
        }
        assert!(output.find("Income").unwrap() < output.find("Expenses").unwrap());
        assert!(!output.contains("budget:"));
    }

    #[test]
    fn test_tree_shows_targets() {
        let mut budgets = BudgetRegistry::default();
        budgets.set(Category::Marketing, Money::from_cents(5000)).unwrap();
        budgets.set(Category::SalesRevenue, Money::from_cents(90000)).unwrap();

        let output = format_category_tree(&budgets);
        assert!(output.contains("Marketing (budget: ₱50.00)"));
        assert!(output.contains("Sales / Revenue (forecast: ₱900.00)"));
    }
}
