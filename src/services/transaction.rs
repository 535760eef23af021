//! Transaction service
//!
//! Adds and deletes live transactions, persisting the ledger and writing an
//! audit entry after each change.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::{NewTransaction, Transaction, TransactionId, TransactionType};
use crate::storage::Storage;

/// Options for listing transactions
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service for live transaction management
pub struct TransactionService<'a> {
    storage: &'a mut Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Validate and record a new transaction
    pub fn add(&mut self, input: NewTransaction) -> CyclebookResult<Transaction> {
        let txn = self
            .storage
            .state_mut()
            .transactions
            .add(input)
            .map_err(|e| CyclebookError::Validation(e.to_string()))?
            .clone();

        self.storage.save()?;

        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "Added transaction");
        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        );

        Ok(txn)
    }

    /// Remove a transaction by ID
    pub fn delete(&mut self, id: TransactionId) -> CyclebookResult<Transaction> {
        let removed = self.storage.state_mut().transactions.delete(id)?;
        self.storage.save()?;

        info!(id = %removed.id, "Deleted transaction");
        self.storage.log_delete(
            EntityType::Transaction,
            removed.id.to_string(),
            Some(format!("{} {}", removed.date, removed.description)),
            &removed,
        );

        Ok(removed)
    }

    /// Resolve a user-supplied reference (full UUID, `txn-` short form or a
    /// UUID prefix) to exactly one transaction
    pub fn find(&self, reference: &str) -> CyclebookResult<&Transaction> {
        let matches = self
            .storage
            .state()
            .transactions
            .find_by_reference(reference);

        match matches.as_slice() {
            [txn] => Ok(*txn),
            [] => Err(CyclebookError::transaction_not_found(reference)),
            several => Err(CyclebookError::Validation(format!(
                "Transaction reference '{}' matches {} transactions; use a longer ID",
                reference,
                several.len()
            ))),
        }
    }

    /// Live transactions in display order (date, then creation time, newest first)
    pub fn list(&self, filter: TransactionFilter) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .storage
            .state()
            .transactions
            .sorted_for_storage()
            .into_iter()
            .filter(|t| filter.kind.map_or(true, |kind| t.kind == kind))
            .collect();

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        transactions
    }
}
