//! Budget service
//!
//! Saves expense budgets and income forecasts for the live cycle.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::{BudgetRegistry, Category, Money, TransactionType};
use crate::storage::Storage;

/// Service for the budget registry
pub struct BudgetService<'a> {
    storage: &'a mut Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn budgets(&self) -> &BudgetRegistry {
        &self.storage.state().budgets
    }

    /// Save budgets from user-entered text
    ///
    /// Blank or non-numeric entries are stored as zero. If any entry is
    /// negative or beyond the maximum amount nothing is saved.
    pub fn save_inputs<'s>(
        &mut self,
        inputs: impl IntoIterator<Item = (Category, &'s str)>,
    ) -> CyclebookResult<&BudgetRegistry> {
        let updates = inputs
            .into_iter()
            .map(|(category, raw)| {
                BudgetRegistry::parse_amount(raw)
                    .map(|amount| (category, amount))
                    .map_err(|e| CyclebookError::Validation(format!("{}: {}", category, e)))
            })
            .collect::<CyclebookResult<Vec<_>>>()?;

        self.save(updates)
    }

    /// Save a batch of amounts, all or nothing
    ///
    /// Categories not in `updates` keep their current amount.
    pub fn save(
        &mut self,
        updates: impl IntoIterator<Item = (Category, Money)>,
    ) -> CyclebookResult<&BudgetRegistry> {
        let before = self.storage.state().budgets.clone();

        self.storage
            .state_mut()
            .budgets
            .apply(updates)
            .map_err(|e| CyclebookError::Validation(e.to_string()))?;

        self.storage.save()?;

        let after = &self.storage.state().budgets;
        if *after != before {
            info!(
                total_budget = %after.total_for(TransactionType::Expense),
                "Saved budgets"
            );
            self.storage
                .log_update(EntityType::Budgets, "budgets", None, &before, after);
        }

        Ok(&self.storage.state().budgets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_inputs() {
        let mut storage = Storage::in_memory();
        let mut service = BudgetService::new(&mut storage);

        service
            .save_inputs(vec![
                (Category::RentLease, "100"),
                (Category::Marketing, ""),
                (Category::SalesRevenue, "2,500.50"),
            ])
            .unwrap();

        let budgets = service.budgets();
        assert_eq!(budgets.get(Category::RentLease), Money::from_cents(10000));
        assert_eq!(budgets.get(Category::Marketing), Money::zero());
        assert_eq!(budgets.total_for(TransactionType::Income), Money::from_cents(250050));
    }

    #[test]
    fn test_negative_input_saves_nothing() {
        let mut storage = Storage::in_memory();
        let mut service = BudgetService::new(&mut storage);

        let err = service
            .save_inputs(vec![(Category::RentLease, "100"), (Category::Marketing, "-1")])
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("Marketing"));
        assert!(storage.state().budgets.is_empty());
    }

    #[test]
    fn test_save_persists_and_merges() {
        let mut storage = Storage::in_memory();
        BudgetService::new(&mut storage)
            .save(vec![(Category::RentLease, Money::from_cents(100))])
            .unwrap();
        BudgetService::new(&mut storage)
            .save(vec![(Category::Marketing, Money::from_cents(200))])
            .unwrap();

        storage.reload();
        let budgets = &storage.state().budgets;
        assert_eq!(budgets.get(Category::RentLease), Money::from_cents(100));
        assert_eq!(budgets.get(Category::Marketing), Money::from_cents(200));
    }
}
