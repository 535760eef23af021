//! Archived cycle records
//!
//! A [`HistoryRecord`] is the frozen snapshot of one finalized cycle. Records
//! are created once by the archiver and never modified afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::Category;
use super::cycle::CycleType;
use super::ids::RecordId;
use super::money::Money;
use super::transaction::Transaction;

/// Per-category outcome of an archived cycle
///
/// Stored untagged: expense entries carry `budget`/`spent`, income entries
/// carry `forecast`/`actual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategorySummary {
    /// `variance = budget - spent`
    Expense {
        budget: Money,
        spent: Money,
        variance: Money,
    },
    /// `variance = actual - forecast`
    Income {
        forecast: Money,
        actual: Money,
        variance: Money,
    },
}

impl CategorySummary {
    pub fn expense(budget: Money, spent: Money) -> Self {
        Self::Expense {
            budget,
            spent,
            variance: budget - spent,
        }
    }

    pub fn income(forecast: Money, actual: Money) -> Self {
        Self::Income {
            forecast,
            actual,
            variance: actual - forecast,
        }
    }

    /// The amount spent or earned
    pub fn actual(&self) -> Money {
        match self {
            Self::Expense { spent, .. } => *spent,
            Self::Income { actual, .. } => *actual,
        }
    }

    /// The budget ceiling or income forecast
    pub fn target(&self) -> Money {
        match self {
            Self::Expense { budget, .. } => *budget,
            Self::Income { forecast, .. } => *forecast,
        }
    }

    pub fn variance(&self) -> Money {
        match self {
            Self::Expense { variance, .. } | Self::Income { variance, .. } => *variance,
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income { .. })
    }

    /// Under budget for expenses, at or above forecast for income
    pub fn is_favorable(&self) -> bool {
        !self.variance().is_negative()
    }

    /// Short verdict shown next to the variance
    pub fn verdict(&self) -> &'static str {
        match (self.is_income(), self.is_favorable()) {
            (false, true) => "Saved",
            (false, false) => "Over",
            (true, true) => "Above Forecast",
            (true, false) => "Below Forecast",
        }
    }
}

/// Snapshot of a finalized cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: RecordId,

    /// Start date of the archived cycle
    pub cycle_start: NaiveDate,

    /// Cycle type at the time of archiving
    pub cycle_type: CycleType,

    /// Sum of the expense budgets
    pub starting_budget: Money,

    pub total_income: Money,
    pub total_expenses: Money,

    /// `total_income - total_expenses`
    pub net_flow: Money,

    /// One entry per category, expense and income
    #[serde(default)]
    pub category_summary: BTreeMap<Category, CategorySummary>,

    /// Copy of the cycle's transactions
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// When the cycle was finalized (absent in older data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl HistoryRecord {
    /// Display label of the archived cycle
    pub fn label(&self) -> String {
        self.cycle_type.label(self.cycle_start)
    }

    pub fn is_deficit(&self) -> bool {
        self.net_flow.is_negative()
    }

    /// Budget left over (negative when overspent)
    pub fn budget_variance(&self) -> Money {
        self.starting_budget - self.total_expenses
    }

    /// Category summary sorted by amount spent or earned, largest first
    pub fn summary_by_amount(&self) -> Vec<(Category, CategorySummary)> {
        let mut entries: Vec<_> = self
            .category_summary
            .iter()
            .map(|(c, s)| (*c, *s))
            .collect();
        entries.sort_by(|a, b| b.1.actual().cmp(&a.1.actual()));
        entries
    }
}
