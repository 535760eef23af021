//! Budget registry
//!
//! Per-category amounts for the live cycle. For expense categories the amount
//! is a spending ceiling, for income categories it is a forecast target.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::category::Category;
use super::money::{Money, MoneyParseError};
use super::transaction::TransactionType;

/// Category budgets and income forecasts for the live cycle
///
/// Serialized as a map from category name to decimal amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetRegistry {
    amounts: BTreeMap<Category, Money>,
}

impl BudgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount for a category
    pub fn set(&mut self, category: Category, amount: Money) -> Result<(), BudgetValidationError> {
        validate_amount(category, amount)?;
        self.amounts.insert(category, amount);
        Ok(())
    }

    /// Parse a user-entered budget amount
    ///
    /// Blank or unparseable input means "no budget" and becomes zero. A
    /// negative number or one beyond [`Money::MAX`] is rejected.
    pub fn parse_amount(input: &str) -> Result<Money, BudgetValidationError> {
        let amount = match Money::parse(input) {
            Ok(amount) => amount,
            Err(MoneyParseError::OutOfRange(_)) => {
                return Err(BudgetValidationError::OutOfRange {
                    input: input.trim().to_string(),
                })
            }
            Err(MoneyParseError::InvalidFormat(_)) => Money::zero(),
        };
        if amount.is_negative() {
            return Err(BudgetValidationError::Negative {
                input: input.trim().to_string(),
            });
        }
        Ok(amount)
    }

    /// Amount for a category, zero when unset
    pub fn get(&self, category: Category) -> Money {
        self.amounts.get(&category).copied().unwrap_or_default()
    }

    /// Whether an amount was explicitly stored for the category
    pub fn contains(&self, category: Category) -> bool {
        self.amounts.contains_key(&category)
    }

    /// Apply a batch of updates
    ///
    /// Either every entry is valid and all of them are stored, or nothing
    /// changes. Categories not named in `updates` keep their amounts.
    pub fn apply<I>(&mut self, updates: I) -> Result<(), BudgetValidationError>
    where
        I: IntoIterator<Item = (Category, Money)>,
    {
        let mut staged = self.amounts.clone();
        for (category, amount) in updates {
            validate_amount(category, amount)?;
            staged.insert(category, amount);
        }
        self.amounts = staged;
        Ok(())
    }

    /// Sum of the amounts for every category of one type
    pub fn total_for(&self, kind: TransactionType) -> Money {
        Category::for_kind(kind).iter().map(|c| self.get(*c)).sum()
    }

    /// Remove every amount
    pub fn clear(&mut self) {
        self.amounts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Money)> + '_ {
        self.amounts.iter().map(|(c, m)| (*c, *m))
    }
}

impl FromIterator<(Category, Money)> for BudgetRegistry {
    fn from_iter<I: IntoIterator<Item = (Category, Money)>>(iter: I) -> Self {
        Self {
            amounts: iter.into_iter().collect(),
        }
    }
}

fn validate_amount(category: Category, amount: Money) -> Result<(), BudgetValidationError> {
    if amount.is_negative() {
        return Err(BudgetValidationError::NegativeAmount { category, amount });
    }
    if !amount.is_within_limit() {
        return Err(BudgetValidationError::AmountTooLarge { category, amount });
    }
    Ok(())
}

/// Validation errors for budget amounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeAmount { category: Category, amount: Money },
    AmountTooLarge { category: Category, amount: Money },
    Negative { input: String },
    OutOfRange { input: String },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount { category, amount } => write!(
                f,
                "Budget for '{}' cannot be negative (got {})",
                category, amount
            ),
            Self::AmountTooLarge { category, amount } => write!(
                f,
                "Budget for '{}' exceeds the maximum of {} (got {})",
                category,
                Money::MAX,
                amount
            ),
            Self::Negative { input } => {
                write!(f, "Budget amounts cannot be negative (got '{}')", input)
            }
            Self::OutOfRange { input } => write!(
                f,
                "Budget amounts cannot exceed {} (got '{}')",
                Money::MAX,
                input
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
