//! Transaction model and the live transaction store
//!
//! Transactions are dated income or expense entries against a fixed category.
//! Once created they are never edited, only deleted or archived.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CyclebookError, CyclebookResult};

use super::category::Category;
use super::ids::TransactionId;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out (default for incomplete stored data)
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(TransactionValidationError::UnknownType(other.to_string())),
        }
    }
}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// What the transaction was for
    pub description: String,

    /// Always positive; the direction comes from `kind`
    pub amount: Money,

    /// Category matching `kind`
    pub category: Category,

    /// Transaction date
    pub date: NaiveDate,

    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// The amount with the sign of its direction (negative for expenses)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount(),
            self.category
        )
    }
}

/// User input for a new transaction, before validation
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub description: String,
    pub amount: Money,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    /// Input with every field supplied
    pub fn new(
        kind: TransactionType,
        description: impl Into<String>,
        amount: Money,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            category: Some(category),
            date: Some(date),
        }
    }

    /// Validate the input and build a transaction with a fresh id and timestamp
    pub fn validate(self) -> Result<Transaction, TransactionValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_limit() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        let date = self.date.ok_or(TransactionValidationError::MissingDate)?;
        let category = self
            .category
            .ok_or(TransactionValidationError::MissingCategory)?;

        if !category.belongs_to(self.kind) {
            return Err(TransactionValidationError::CategoryTypeMismatch {
                kind: self.kind,
                category,
            });
        }

        Ok(Transaction {
            id: TransactionId::new(),
            kind: self.kind,
            description: description.to_string(),
            amount: self.amount,
            category,
            date,
            created_at: Utc::now(),
        })
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    MissingDate,
    MissingCategory,
    CategoryTypeMismatch {
        kind: TransactionType,
        category: Category,
    },
    UnknownType(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount cannot exceed {} (got {})", Money::MAX, amount)
            }
            Self::MissingDate => write!(f, "A transaction date is required"),
            Self::MissingCategory => write!(f, "A category is required"),
            Self::CategoryTypeMismatch { kind, category } => write!(
                f,
                "Cannot log an {} with the {} category '{}'",
                kind.as_str().to_uppercase(),
                category.kind().as_str().to_uppercase(),
                category
            ),
            Self::UnknownType(s) => {
                write!(f, "Unknown transaction type '{}': expected income or expense", s)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Ordered collection of the live cycle's transactions
///
/// New entries go to the head, so in memory the newest insert comes first.
/// The persisted order (date, then creation time, both descending) is
/// produced separately by [`TransactionStore::sorted_for_storage`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-validated transactions, keeping their order
    pub fn from_vec(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Validate and insert a new transaction at the head
    ///
    /// The store is left untouched when validation fails.
    pub fn add(&mut self, input: NewTransaction) -> Result<&Transaction, TransactionValidationError> {
        let txn = input.validate()?;
        self.transactions.insert(0, txn);
        Ok(&self.transactions[0])
    }

    /// Remove a transaction by ID
    ///
    /// Returns `NotFound` and leaves the store unchanged when no transaction
    /// has this ID.
    pub fn delete(&mut self, id: TransactionId) -> CyclebookResult<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CyclebookError::transaction_not_found(id.to_string()))?;
        Ok(self.transactions.remove(index))
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Transactions whose ID matches a user-supplied reference
    pub fn find_by_reference(&self, reference: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.id.matches(reference))
            .collect()
    }

    /// Lazily iterate over the transactions of one type
    pub fn filter_by_type(
        &self,
        kind: TransactionType,
    ) -> impl Iterator<Item = &Transaction> + Clone + '_ {
        self.transactions.iter().filter(move |t| t.kind == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Remove every transaction
    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    /// Copy of the transactions in persisted order: date desc, then created_at desc
    pub fn sorted_for_storage(&self) -> Vec<Transaction> {
        let mut sorted = self.transactions.clone();
        sort_for_storage(&mut sorted);
        sorted
    }
}

/// Sort transactions newest first by date, then by creation time
pub fn sort_for_storage(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

impl<'a> IntoIterator for &'a TransactionStore {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
