//! Category registry
//!
//! The tracker works against a fixed set of income and expense categories.
//! The two lists are disjoint, so every category resolves to exactly one
//! transaction type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transaction::TransactionType;

/// A budgeting category
///
/// Serialized by its display name (e.g. `"Rent / Lease"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Sales / Revenue")]
    SalesRevenue,
    #[serde(rename = "Other Income")]
    OtherIncome,
    #[serde(rename = "Inventory Cost / Service Cost")]
    InventoryCost,
    #[serde(rename = "Administrative")]
    Administrative,
    #[serde(rename = "Rent / Lease")]
    RentLease,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Salaries & Benefits")]
    SalariesBenefits,
    #[serde(rename = "Transportation / Logistics")]
    Transportation,
}

impl Category {
    /// Income categories in display order
    pub const INCOME: &'static [Category] = &[Category::SalesRevenue, Category::OtherIncome];

    /// Expense categories in display order
    pub const EXPENSE: &'static [Category] = &[
        Category::InventoryCost,
        Category::Administrative,
        Category::RentLease,
        Category::Marketing,
        Category::SalariesBenefits,
        Category::Transportation,
    ];

    /// Every category, income first
    pub const ALL: &'static [Category] = &[
        Category::SalesRevenue,
        Category::OtherIncome,
        Category::InventoryCost,
        Category::Administrative,
        Category::RentLease,
        Category::Marketing,
        Category::SalariesBenefits,
        Category::Transportation,
    ];

    /// Display name, also used as the persisted key
    pub fn name(&self) -> &'static str {
        match self {
            Self::SalesRevenue => "Sales / Revenue",
            Self::OtherIncome => "Other Income",
            Self::InventoryCost => "Inventory Cost / Service Cost",
            Self::Administrative => "Administrative",
            Self::RentLease => "Rent / Lease",
            Self::Marketing => "Marketing",
            Self::SalariesBenefits => "Salaries & Benefits",
            Self::Transportation => "Transportation / Logistics",
        }
    }

    /// The transaction type this category belongs to
    pub fn kind(&self) -> TransactionType {
        match self {
            Self::SalesRevenue | Self::OtherIncome => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind() == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind() == TransactionType::Expense
    }

    /// Whether this category may be used with the given transaction type
    pub fn belongs_to(&self, kind: TransactionType) -> bool {
        self.kind() == kind
    }

    /// The ordered category list for a transaction type
    pub fn for_kind(kind: TransactionType) -> &'static [Category] {
        match kind {
            TransactionType::Income => Self::INCOME,
            TransactionType::Expense => Self::EXPENSE,
        }
    }

    /// Generic category used when stored data names an unknown category
    pub fn fallback_for(kind: TransactionType) -> Category {
        match kind {
            TransactionType::Income => Self::OtherIncome,
            TransactionType::Expense => Self::Administrative,
        }
    }

    /// Look up a category by exact name or by an unambiguous case-insensitive prefix
    ///
    /// `"rent"` resolves to `Rent / Lease`; `"s"` is ambiguous and fails.
    pub fn resolve(input: &str) -> Result<Category, CategoryParseError> {
        if let Ok(category) = input.parse::<Category>() {
            return Ok(category);
        }

        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CategoryParseError::Unknown(input.to_string()));
        }

        let matches: Vec<Category> = Self::ALL
            .iter()
            .copied()
            .filter(|c| c.name().to_lowercase().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(CategoryParseError::Unknown(input.to_string())),
            _ => Err(CategoryParseError::Ambiguous(
                input.to_string(),
                matches.iter().map(|c| c.name()).collect(),
            )),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| CategoryParseError::Unknown(s.to_string()))
    }
}

/// Error type for category lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryParseError {
    Unknown(String),
    Ambiguous(String, Vec<&'static str>),
}

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(s) => write!(f, "Unknown category: '{}'", s),
            Self::Ambiguous(s, candidates) => write!(
                f,
                "Category '{}' is ambiguous: {}",
                s,
                candidates.join(", ")
            ),
        }
    }
}

impl std::error::Error for CategoryParseError {}
