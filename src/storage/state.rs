//! Loading and saving the ledger state through a key-value store
//!
//! Loading never fails: missing or damaged entries are replaced with
//! defaults and reported through `tracing`. Saving writes every key and
//! returns any failure to the caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::kv::{
    KeyValueStore, KEY_CATEGORY_BUDGETS, KEY_COMPANY_NAME, KEY_CURRENT_CYCLE_START,
    KEY_CURRENT_TRANSACTIONS, KEY_CYCLE_HISTORY, KEY_CYCLE_TYPE,
};
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::cycle::today;
use crate::models::state::normalize_company_name;
use crate::models::{
    BudgetRegistry, Category, CycleState, CycleType, HistoryRecord, LedgerState, Money,
    Transaction, TransactionId, TransactionStore, TransactionType,
};

/// Load the ledger state, substituting defaults for anything unusable
///
/// `default_cycle_type` is used when no cycle type has been stored yet.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, default_cycle_type: CycleType) -> LedgerState {
    load_with_repairs(store, default_cycle_type).0
}

/// Like [`load`], also counting the ids that had to be backfilled
///
/// A nonzero count means the loaded state differs from what is stored and
/// should be saved so the new ids stay stable.
pub fn load_with_repairs<S: KeyValueStore + ?Sized>(
    store: &S,
    default_cycle_type: CycleType,
) -> (LedgerState, usize) {
    let mut repaired_ids = 0;

    let company_name = read_entry(store, KEY_COMPANY_NAME)
        .map(|name| normalize_company_name(&name))
        .unwrap_or_else(|| normalize_company_name(""));

    let cycle_type = read_entry(store, KEY_CYCLE_TYPE)
        .and_then(|raw| match raw.parse::<CycleType>() {
            Ok(cycle_type) => Some(cycle_type),
            Err(e) => {
                warn!(error = %e, "Stored cycle type is invalid, using default");
                None
            }
        })
        .unwrap_or(default_cycle_type);

    let cycle_start = read_entry(store, KEY_CURRENT_CYCLE_START)
        .and_then(|raw| match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                warn!(value = %raw, "Stored cycle start is not a date, using today");
                None
            }
        })
        .unwrap_or_else(today);

    let budgets = read_json_entry(store, KEY_CATEGORY_BUDGETS)
        .map(|value| normalize_budgets(&value))
        .unwrap_or_default();

    let transactions = read_json_entry(store, KEY_CURRENT_TRANSACTIONS)
        .map(|value| normalize_transactions(&value, &mut repaired_ids))
        .unwrap_or_default();

    let history = read_json_entry(store, KEY_CYCLE_HISTORY)
        .map(|value| normalize_history(&value, &mut repaired_ids))
        .unwrap_or_default();

    debug!(
        transactions = transactions.len(),
        history = history.len(),
        repaired_ids,
        "Loaded ledger state"
    );

    let state = LedgerState {
        company_name,
        cycle: CycleState::new(cycle_type, cycle_start),
        budgets,
        transactions: TransactionStore::from_vec(transactions),
        history,
    };
    (state, repaired_ids)
}

/// Write the whole ledger state to the store
///
/// Transactions are persisted sorted by date, then creation time, newest
/// first. The in-memory order is left as it is.
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, state: &LedgerState) -> CyclebookResult<()> {
    let encode = |what: &str, result: serde_json::Result<String>| {
        result.map_err(|e| CyclebookError::Persistence(format!("Failed to encode {}: {}", what, e)))
    };

    let budgets = encode("budgets", serde_json::to_string(&state.budgets))?;
    let transactions = encode(
        "transactions",
        serde_json::to_string(&state.transactions.sorted_for_storage()),
    )?;
    let history = encode("history", serde_json::to_string(&state.history))?;

    store.set_many(vec![
        (KEY_COMPANY_NAME, state.company_name.clone()),
        (KEY_CYCLE_TYPE, state.cycle.cycle_type.as_str().to_string()),
        (
            KEY_CURRENT_CYCLE_START,
            state.cycle.cycle_start.format("%Y-%m-%d").to_string(),
        ),
        (KEY_CATEGORY_BUDGETS, budgets),
        (KEY_CURRENT_TRANSACTIONS, transactions),
        (KEY_CYCLE_HISTORY, history),
    ])?;

    debug!("Saved ledger state");
    Ok(())
}

fn read_entry<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored entry, using default");
            None
        }
    }
}

fn read_json_entry<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<Value> {
    let raw = read_entry(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Stored entry is not valid JSON, using default");
            None
        }
    }
}

/// Accepts a plain ISO date or the date part of an ISO timestamp
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// A number, or a string holding one; anything else is zero
///
/// Amounts beyond [`Money::MAX`] are also zero.
fn coerce_amount(value: Option<&Value>) -> Money {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().and_then(Money::from_f64),
        Some(Value::String(s)) => Money::parse(s).ok(),
        _ => return Money::zero(),
    };
    amount.unwrap_or_else(|| {
        warn!("Stored amount is unreadable or out of range, using zero");
        Money::zero()
    })
}

/// The stored id as a UUID
///
/// A non-UUID id maps to a UUID derived from its text, so it stays the same
/// on every load. A missing or blank id gets a fresh one. Both count as a
/// repair.
fn stored_uuid(value: Option<&Value>, repaired: &mut usize) -> Uuid {
    let raw = value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match raw.map(|s| (s, Uuid::parse_str(s))) {
        Some((_, Ok(uuid))) => uuid,
        Some((legacy, Err(_))) => {
            *repaired += 1;
            Uuid::new_v5(&Uuid::NAMESPACE_OID, legacy.as_bytes())
        }
        None => {
            *repaired += 1;
            Uuid::new_v4()
        }
    }
}

fn normalize_budgets(value: &Value) -> BudgetRegistry {
    let Some(entries) = value.as_object() else {
        warn!("Stored budgets are not an object, starting with none");
        return BudgetRegistry::new();
    };

    entries
        .iter()
        .filter_map(|(name, amount)| {
            let Ok(category) = name.parse::<Category>() else {
                warn!(category = %name, "Dropping budget for unknown category");
                return None;
            };
            let amount = coerce_amount(Some(amount));
            if amount.is_negative() {
                warn!(category = %name, "Dropping negative budget");
                return None;
            }
            Some((category, amount))
        })
        .collect()
}

fn normalize_transactions(value: &Value, repaired: &mut usize) -> Vec<Transaction> {
    let Some(items) = value.as_array() else {
        warn!("Stored transactions are not a list, starting with none");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(fields) => Some(normalize_transaction(fields, repaired)),
            None => {
                warn!("Skipping stored transaction that is not an object");
                None
            }
        })
        .collect()
}

/// Backfill the fields of one stored transaction
///
/// A category that is unknown, or belongs to the other transaction type, is
/// replaced with the generic category of the transaction's type.
fn normalize_transaction(fields: &Map<String, Value>, repaired: &mut usize) -> Transaction {
    let text = |key: &str| fields.get(key).and_then(Value::as_str);

    let kind = text("type")
        .and_then(|s| s.parse::<TransactionType>().ok())
        .unwrap_or_default();

    let id = TransactionId::from(stored_uuid(fields.get("id"), repaired));

    let category = match text("category").map(str::parse::<Category>) {
        Some(Ok(category)) if category.belongs_to(kind) => category,
        other => {
            let fallback = Category::fallback_for(kind);
            if other.is_some() {
                warn!(id = %id, category = %fallback, "Remapping stored transaction category");
            }
            fallback
        }
    };

    let date = text("date").and_then(parse_date).unwrap_or_else(today);

    let created_at = text("createdAt")
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Transaction {
        id,
        kind,
        description: text("description").unwrap_or_default().to_string(),
        amount: coerce_amount(fields.get("amount")),
        category,
        date,
        created_at,
    }
}

fn normalize_history(value: &Value, repaired: &mut usize) -> Vec<HistoryRecord> {
    let Some(items) = value.as_array() else {
        warn!("Stored history is not a list, starting with none");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let mut item = item.clone();
            if let Some(fields) = item.as_object_mut() {
                let id = stored_uuid(fields.get("id"), repaired);
                fields.insert("id".to_string(), Value::String(id.to_string()));

                if let Some(embedded) = fields.get("transactions") {
                    let transactions = normalize_transactions(embedded, repaired);
                    // Freshly built transactions always serialize
                    let transactions =
                        serde_json::to_value(transactions).unwrap_or(Value::Array(Vec::new()));
                    fields.insert("transactions".to_string(), transactions);
                }
            }
            match serde_json::from_value::<HistoryRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable history record");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;
    use crate::storage::kv::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::with_cycle(CycleState::new(CycleType::Weekly, date(2024, 1, 15)));
        state.company_name = "Acme Trading".into();
        state
            .budgets
            .set(Category::RentLease, Money::from_cents(10000))
            .unwrap();
        state
            .transactions
            .add(NewTransaction::new(
                TransactionType::Expense,
                "Rent",
                Money::from_cents(10000),
                Category::RentLease,
                date(2024, 1, 16),
            ))
            .unwrap();
        state
            .transactions
            .add(NewTransaction::new(
                TransactionType::Income,
                "Invoice",
                Money::from_cents(50000),
                Category::SalesRevenue,
                date(2024, 1, 15),
            ))
            .unwrap();
        state
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let state = load(&store, CycleType::Yearly);

        assert_eq!(state.company_name, "Company");
        assert_eq!(state.cycle.cycle_type, CycleType::Yearly);
        assert_eq!(state.cycle.cycle_start, today());
        assert!(state.budgets.is_empty());
        assert!(state.transactions.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let state = sample_state();
        let mut store = MemoryStore::new();
        save(&mut store, &state).unwrap();

        let loaded = load(&store, CycleType::Monthly);
        assert_eq!(loaded.company_name, "Acme Trading");
        assert_eq!(loaded.cycle, state.cycle);
        assert_eq!(loaded.budgets, state.budgets);
        assert_eq!(loaded.transactions.len(), 2);
    }

    #[test]
    fn test_save_sorts_transactions_but_not_memory() {
        let state = sample_state();
        let mut store = MemoryStore::new();
        save(&mut store, &state).unwrap();

        // In memory the income (inserted last) comes first
        assert!(state.transactions.as_slice()[0].is_income());

        let loaded = load(&store, CycleType::Monthly);
        let dates: Vec<NaiveDate> = loaded.transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 16), date(2024, 1, 15)]);
    }

    #[test]
    fn test_corrupt_entries_fall_back() {
        let mut store = MemoryStore::new();
        store.set(KEY_COMPANY_NAME, "  ".into()).unwrap();
        store.set(KEY_CYCLE_TYPE, "fortnightly".into()).unwrap();
        store.set(KEY_CURRENT_CYCLE_START, "soon".into()).unwrap();
        store.set(KEY_CATEGORY_BUDGETS, "{not json".into()).unwrap();
        store.set(KEY_CURRENT_TRANSACTIONS, "42".into()).unwrap();
        store.set(KEY_CYCLE_HISTORY, "[1, 2".into()).unwrap();

        let state = load(&store, CycleType::Monthly);
        assert_eq!(state.company_name, "Company");
        assert_eq!(state.cycle.cycle_type, CycleType::Monthly);
        assert_eq!(state.cycle.cycle_start, today());
        assert!(state.budgets.is_empty());
        assert!(state.transactions.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_transactions_are_backfilled() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY_CURRENT_TRANSACTIONS,
                r#"[
                    {"type": "income", "description": "Tips", "amount": "12.50", "category": "Marketing", "date": "2024-02-01"},
                    {"description": "Legacy", "amount": "abc"},
                    {"type": "expense", "amount": 30, "category": "Groceries", "date": "2024-02-03T00:00:00.000Z"},
                    "garbage"
                ]"#
                .into(),
            )
            .unwrap();

        let state = load(&store, CycleType::Monthly);
        let txns = state.transactions.as_slice();
        assert_eq!(txns.len(), 3);

        // Wrong-type category remapped to the income fallback
        assert_eq!(txns[0].kind, TransactionType::Income);
        assert_eq!(txns[0].amount, Money::from_cents(1250));
        assert_eq!(txns[0].category, Category::OtherIncome);
        assert_eq!(txns[0].date, date(2024, 2, 1));

        // Missing type, date and category
        assert_eq!(txns[1].kind, TransactionType::Expense);
        assert_eq!(txns[1].amount, Money::zero());
        assert_eq!(txns[1].category, Category::Administrative);
        assert_eq!(txns[1].date, today());

        // Unknown category and timestamp-shaped date
        assert_eq!(txns[2].category, Category::Administrative);
        assert_eq!(txns[2].amount, Money::from_cents(3000));
        assert_eq!(txns[2].date, date(2024, 2, 3));

        for txn in txns {
            assert!(txn.category.belongs_to(txn.kind));
        }
        assert_ne!(txns[0].id, txns[1].id);
    }

    #[test]
    fn test_budgets_drop_unknown_and_negative() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY_CATEGORY_BUDGETS,
                r#"{"Rent / Lease": "100", "Marketing": -5, "Fun": 10, "Sales / Revenue": 900.5, "Administrative": "n/a"}"#
                    .into(),
            )
            .unwrap();

        let state = load(&store, CycleType::Monthly);
        assert_eq!(state.budgets.get(Category::RentLease), Money::from_cents(10000));
        assert!(!state.budgets.contains(Category::Marketing));
        assert_eq!(
            state.budgets.get(Category::SalesRevenue),
            Money::from_cents(90050)
        );
        assert!(state.budgets.contains(Category::Administrative));
        assert_eq!(state.budgets.get(Category::Administrative), Money::zero());
    }

    #[test]
    fn test_unreadable_history_records_are_skipped() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY_CYCLE_HISTORY,
                r#"[
                    {"id": "0b7c6f1e-2f55-4c8e-9d51-5a0f4a3b2c10", "cycleStart": "2024-01-01", "cycleType": "monthly",
                     "startingBudget": 100, "totalIncome": 50, "totalExpenses": 20, "netFlow": 30,
                     "categorySummary": {"Rent / Lease": {"budget": 100, "spent": 20, "variance": 80}},
                     "transactions": [{"type": "expense", "amount": 20, "category": "Rent / Lease", "date": "2024-01-05"}]},
                    {"cycleStart": "not a date"}
                ]"#
                .into(),
            )
            .unwrap();

        let state = load(&store, CycleType::Monthly);
        assert_eq!(state.history.len(), 1);
        let record = &state.history[0];
        assert_eq!(record.net_flow, Money::from_cents(3000));
        assert_eq!(record.transactions.len(), 1);
        assert_eq!(record.transactions[0].category, Category::RentLease);
    }

    #[test]
    fn test_legacy_history_ids_are_kept() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY_CYCLE_HISTORY,
                r#"[
                    {"id": "lr7k2ab3xyz", "cycleStart": "2024-01-01", "cycleType": "monthly",
                     "startingBudget": 100, "totalIncome": 50, "totalExpenses": 20, "netFlow": 30,
                     "categorySummary": {}, "transactions": []},
                    {"cycleStart": "2024-02-01", "cycleType": "monthly",
                     "startingBudget": 0, "totalIncome": 0, "totalExpenses": 0, "netFlow": 0,
                     "categorySummary": {}, "transactions": []}
                ]"#
                .into(),
            )
            .unwrap();

        let (state, repaired) = load_with_repairs(&store, CycleType::Monthly);
        assert_eq!(state.history.len(), 2);
        assert_eq!(repaired, 2);
        assert_eq!(state.history[0].net_flow, Money::from_cents(3000));
        assert_ne!(state.history[0].id, state.history[1].id);

        // The derived id does not change between loads
        let again = load(&store, CycleType::Monthly);
        assert_eq!(again.history[0].id, state.history[0].id);
    }

    #[test]
    fn test_legacy_transaction_ids_are_stable() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY_CURRENT_TRANSACTIONS,
                r#"[
                    {"id": "lr7k2ab3xyz", "type": "expense", "amount": 5, "category": "Marketing", "date": "2024-02-01"},
                    {"id": "lr7k2ab4qrs", "type": "expense", "amount": 6, "category": "Marketing", "date": "2024-02-01"}
                ]"#
                .into(),
            )
            .unwrap();

        let first = load(&store, CycleType::Monthly);
        let second = load(&store, CycleType::Monthly);
        let ids = |state: &LedgerState| -> Vec<TransactionId> {
            state.transactions.iter().map(|t| t.id).collect()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_ne!(ids(&first)[0], ids(&first)[1]);
    }

    #[test]
    fn test_valid_ids_need_no_repair() {
        let mut store = MemoryStore::new();
        save(&mut store, &sample_state()).unwrap();

        let (_, repaired) = load_with_repairs(&store, CycleType::Monthly);
        assert_eq!(repaired, 0);
    }

    #[test]
    fn test_out_of_range_amounts_load_as_zero() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY_CURRENT_TRANSACTIONS,
                r#"[
                    {"type": "expense", "amount": 92233720368547758, "category": "Marketing", "date": "2024-02-01"},
                    {"type": "expense", "amount": "92233720368547758", "category": "Marketing", "date": "2024-02-01"},
                    {"type": "expense", "amount": 1e300, "category": "Marketing", "date": "2024-02-01"}
                ]"#
                .into(),
            )
            .unwrap();

        let state = load(&store, CycleType::Monthly);
        assert_eq!(state.transactions.len(), 3);
        assert!(state.transactions.iter().all(|t| t.amount.is_zero()));
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> CyclebookResult<Option<String>> {
            Err(CyclebookError::Persistence("unavailable".into()))
        }

        fn set(&mut self, _key: &str, _value: String) -> CyclebookResult<()> {
            Err(CyclebookError::Persistence("quota exceeded".into()))
        }
    }

    #[test]
    fn test_failing_store() {
        let state = load(&FailingStore, CycleType::Weekly);
        assert_eq!(state.cycle.cycle_type, CycleType::Weekly);

        let err = save(&mut FailingStore, &sample_state()).unwrap_err();
        assert!(err.is_persistence());
    }
}
