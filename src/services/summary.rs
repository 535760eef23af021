//! Aggregation over the live cycle
//!
//! Totals, per-category breakdowns and budget utilization are derived from
//! the transaction store and the budget registry on every call. Nothing is
//! cached, so the figures always reflect the current state.

use crate::models::{Category, LedgerState, Money, TransactionType};

/// Cycle-wide totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total_income: Money,
    pub total_expenses: Money,
    /// Sum of the expense budgets; income forecasts are not included
    pub total_budget: Money,
    /// `total_budget - total_expenses`
    pub variance: Money,
    /// `total_income - total_expenses`
    pub net_flow: Money,
}

/// Spending against budget for one expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub amount_spent: Money,
    pub budget: Money,
    /// `budget - amount_spent`
    pub variance: Money,
}

impl CategoryBreakdown {
    pub fn is_overspent(&self) -> bool {
        self.variance.is_negative()
    }
}

/// Earnings against forecast for one income category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeBreakdown {
    pub category: Category,
    pub forecast: Money,
    pub actual: Money,
    /// `actual - forecast`
    pub variance: Money,
}

/// Overall budget utilization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetProgress {
    pub spent: Money,
    pub budget: Money,
    /// `budget - spent`, negative when over budget
    pub remaining: Money,
    /// Share of the budget spent; 100 when spending without a budget
    pub spent_percentage: f64,
    pub is_over: bool,
    pub has_budget: bool,
}

impl BudgetProgress {
    /// Percentage clamped to 100 for drawing a bar
    pub fn bar_percentage(&self) -> f64 {
        self.spent_percentage.min(100.0)
    }

    /// No budget set and nothing spent
    pub fn is_empty(&self) -> bool {
        !self.has_budget && self.spent.is_zero()
    }
}

/// Computes figures for the live cycle
pub struct SummaryService<'a> {
    state: &'a LedgerState,
}

impl<'a> SummaryService<'a> {
    pub fn new(state: &'a LedgerState) -> Self {
        Self { state }
    }

    fn total_of(&self, kind: TransactionType) -> Money {
        self.state
            .transactions
            .filter_by_type(kind)
            .map(|t| t.amount)
            .sum()
    }

    fn actual_for(&self, category: Category) -> Money {
        self.state
            .transactions
            .filter_by_type(category.kind())
            .filter(|t| t.category == category)
            .map(|t| t.amount)
            .sum()
    }

    pub fn totals(&self) -> Totals {
        let total_income = self.total_of(TransactionType::Income);
        let total_expenses = self.total_of(TransactionType::Expense);
        let total_budget = self.state.budgets.total_for(TransactionType::Expense);

        Totals {
            total_income,
            total_expenses,
            total_budget,
            variance: total_budget - total_expenses,
            net_flow: total_income - total_expenses,
        }
    }

    /// One entry per expense category, largest spending first
    ///
    /// Categories with equal spending keep their registry order.
    pub fn category_breakdown(&self) -> Vec<CategoryBreakdown> {
        let mut breakdown: Vec<CategoryBreakdown> = Category::EXPENSE
            .iter()
            .map(|&category| {
                let amount_spent = self.actual_for(category);
                let budget = self.state.budgets.get(category);
                CategoryBreakdown {
                    category,
                    amount_spent,
                    budget,
                    variance: budget - amount_spent,
                }
            })
            .collect();

        // sort_by is stable
        breakdown.sort_by(|a, b| b.amount_spent.cmp(&a.amount_spent));
        breakdown
    }

    /// One entry per income category, in registry order
    pub fn income_breakdown(&self) -> Vec<IncomeBreakdown> {
        Category::INCOME
            .iter()
            .map(|&category| {
                let actual = self.actual_for(category);
                let forecast = self.state.budgets.get(category);
                IncomeBreakdown {
                    category,
                    forecast,
                    actual,
                    variance: actual - forecast,
                }
            })
            .collect()
    }

    pub fn budget_progress(&self) -> BudgetProgress {
        let totals = self.totals();
        let spent = totals.total_expenses;
        let budget = totals.total_budget;

        let spent_percentage = if budget.is_positive() {
            spent.to_f64() / budget.to_f64() * 100.0
        } else if spent.is_positive() {
            100.0
        } else {
            0.0
        };

        BudgetProgress {
            spent,
            budget,
            remaining: totals.variance,
            spent_percentage,
            is_over: totals.variance.is_negative(),
            has_budget: budget.is_positive(),
        }
    }
}
