//! Cycle overview report
//!
//! Dashboard for the live cycle: totals, overall budget progress and the
//! per-category breakdowns.

use crate::display::report::{format_bar, format_percentage, format_signed, separator};
use crate::models::{LedgerState, Money};
use crate::services::{BudgetProgress, CategoryBreakdown, IncomeBreakdown, SummaryService, Totals};

const WIDTH: usize = 80;
const BAR_WIDTH: usize = 40;

/// Overview of the live cycle
#[derive(Debug, Clone)]
pub struct CycleOverviewReport {
    pub company_name: String,
    pub label: String,
    pub totals: Totals,
    pub progress: BudgetProgress,
    pub expenses: Vec<CategoryBreakdown>,
    pub income: Vec<IncomeBreakdown>,
}

impl CycleOverviewReport {
    pub fn generate(state: &LedgerState) -> Self {
        let summary = SummaryService::new(state);

        Self {
            company_name: state.company_name.clone(),
            label: state.cycle.label(),
            totals: summary.totals(),
            progress: summary.budget_progress(),
            expenses: summary.category_breakdown(),
            income: summary.income_breakdown(),
        }
    }

    /// Format for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} - {}\n", self.company_name, self.label));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output.push_str(&format!("{:<20} {:>14}\n", "Income:", self.totals.total_income));
        output.push_str(&format!("{:<20} {:>14}\n", "Expenses:", self.totals.total_expenses));
        output.push_str(&format!("{:<20} {:>14}\n", "Net Flow:", self.totals.net_flow));
        output.push_str(&format!("{:<20} {:>14}\n", "Budget:", self.totals.total_budget));
        output.push('\n');

        output.push_str(&self.format_progress());
        output.push('\n');

        output.push_str("Expenses\n");
        output.push_str(&format!(
            "{:<32} {:>14} {:>14} {:>14}\n",
            "Category", "Spent", "Budget", "Variance"
        ));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        for item in &self.expenses {
            let status = if item.is_overspent() { "Over" } else { "Left" };
            output.push_str(&format!(
                "{:<32} {:>14} {:>14} {:>14} {}\n",
                item.category,
                item.amount_spent,
                item.budget,
                item.variance.abs(),
                status
            ));
        }
        output.push('\n');

        output.push_str("Income\n");
        output.push_str(&format!(
            "{:<32} {:>14} {:>14} {:>14}\n",
            "Category", "Actual", "Forecast", "Variance"
        ));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        for item in &self.income {
            output.push_str(&format!(
                "{:<32} {:>14} {:>14} {:>14}\n",
                item.category,
                item.actual,
                item.forecast,
                format_signed(item.variance)
            ));
        }

        output
    }

    fn format_progress(&self) -> String {
        let progress = &self.progress;
        if progress.is_empty() {
            return "No budget set for this cycle.\n".to_string();
        }

        let (caption, amount) = if progress.is_over {
            ("OVER BUDGET", progress.remaining.abs())
        } else {
            ("REMAINING", progress.remaining)
        };

        format!(
            "[{}] {} spent\n{}: {} of {}\n",
            format_bar(progress.bar_percentage(), BAR_WIDTH),
            format_percentage(progress.spent_percentage),
            caption,
            amount,
            budget_caption(progress.budget)
        )
    }
}

fn budget_caption(budget: Money) -> String {
    if budget.is_zero() {
        "no budget".to_string()
    } else {
        budget.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CycleState, CycleType, NewTransaction, TransactionType};
    use chrono::NaiveDate;

    fn state() -> LedgerState {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut state = LedgerState::with_cycle(CycleState::new(CycleType::Monthly, start));
        state.company_name = "Acme Foods".into();
        state
            .transactions
            .add(NewTransaction::new(
                TransactionType::Expense,
                "Rent",
                Money::from_cents(10000),
                Category::RentLease,
                start,
            ))
            .unwrap();
        state
            .transactions
            .add(NewTransaction::new(
                TransactionType::Income,
                "Invoice",
                Money::from_cents(50000),
                Category::SalesRevenue,
                start,
            ))
            .unwrap();
        state
    }

    #[test]
    fn test_generate() {
        let report = CycleOverviewReport::generate(&state());
        assert_eq!(report.label, "January 2024");
        assert_eq!(report.totals.net_flow, Money::from_cents(40000));
        assert_eq!(report.expenses.len(), Category::EXPENSE.len());
        assert_eq!(report.expenses[0].category, Category::RentLease);
        assert_eq!(report.income.len(), Category::INCOME.len());
    }

    #[test]
    fn test_format_over_budget() {
        let mut state = state();
        state
            .budgets
            .set(Category::RentLease, Money::from_cents(8000))
            .unwrap();

        let output = CycleOverviewReport::generate(&state).format_terminal();
        assert!(output.starts_with("Acme Foods - January 2024"));
        assert!(output.contains("OVER BUDGET: ₱20.00 of ₱80.00"));
        assert!(output.contains("125% spent"));
        assert!(output.contains("Over"));
        assert!(output.contains("+₱500.00"));
    }

    #[test]
    fn test_format_remaining() {
        let mut state = state();
        state
            .budgets
            .set(Category::RentLease, Money::from_cents(40000))
            .unwrap();

        let output = CycleOverviewReport::generate(&state).format_terminal();
        assert!(output.contains("REMAINING: ₱300.00 of ₱400.00"));
        assert!(output.contains("25% spent"));
    }

    #[test]
    fn test_spending_without_budget() {
        let output = CycleOverviewReport::generate(&state()).format_terminal();
        assert!(output.contains("OVER BUDGET: ₱100.00 of no budget"));
    }

    #[test]
    fn test_empty_cycle() {
        let state = LedgerState::new(CycleType::Weekly);
        let output = CycleOverviewReport::generate(&state).format_terminal();
        assert!(output.contains("No budget set for this cycle."));
        assert!(output.contains("Company - Week of"));
    }
}
