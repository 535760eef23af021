//! Storage layer for Cyclebook
//!
//! The ledger lives in memory as one [`LedgerState`] and is written in full
//! to a [`KeyValueStore`] after every change. [`Storage`] owns both, plus
//! the optional audit logger.

pub mod file_io;
pub mod kv;
pub mod state;

pub use file_io::{read_json, write_json_atomic};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::CyclebookPaths;
use crate::config::settings::Settings;
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::{CycleType, HistoryRecord, LedgerState};

/// Rename an unreadable ledger file next to itself, returning the new path
fn set_aside_corrupt_ledger(ledger_file: &Path) -> CyclebookResult<PathBuf> {
    let file_name = ledger_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger.json".to_string());
    let stamp = Utc::now().format("%Y%m%d%H%M%S");

    let mut backup = ledger_file.with_file_name(format!("{}.corrupt-{}", file_name, stamp));
    let mut attempt = 1;
    while backup.exists() {
        attempt += 1;
        backup = ledger_file.with_file_name(format!("{}.corrupt-{}-{}", file_name, stamp, attempt));
    }

    std::fs::rename(ledger_file, &backup).map_err(|e| {
        CyclebookError::Persistence(format!(
            "Ledger file {} is unreadable and could not be moved aside: {}",
            ledger_file.display(),
            e
        ))
    })?;
    Ok(backup)
}

/// Owns the ledger state and its backing store
pub struct Storage {
    store: Box<dyn KeyValueStore>,
    state: LedgerState,
    audit: Option<AuditLogger>,
    paths: Option<CyclebookPaths>,
}

impl Storage {
    /// Open the file-backed ledger under `paths`
    ///
    /// A ledger file that cannot be parsed is renamed to
    /// `ledger.json.corrupt-<timestamp>` and the ledger starts empty. If the
    /// rename fails, opening fails and the file is left untouched.
    pub fn open(paths: CyclebookPaths, settings: &Settings) -> CyclebookResult<Self> {
        paths.ensure_directories()?;

        let ledger_file = paths.ledger_file();
        let store = match JsonFileStore::open(&ledger_file) {
            Ok(store) => store,
            Err(e) => {
                let backup = set_aside_corrupt_ledger(&ledger_file)?;
                warn!(
                    error = %e,
                    backup = %backup.display(),
                    "Ledger file is unreadable, moved it aside and starting from defaults"
                );
                JsonFileStore::empty(&ledger_file)
            }
        };

        let mut storage = Self::with_store(store, settings.default_cycle_type);
        if settings.audit_enabled {
            storage.audit = Some(AuditLogger::new(paths.audit_log()));
        }
        storage.paths = Some(paths);
        Ok(storage)
    }

    /// Load the state from any key-value store, without auditing
    ///
    /// Ids backfilled during loading are written back straight away.
    pub fn with_store(store: impl KeyValueStore + 'static, default_cycle_type: CycleType) -> Self {
        let (state, repaired_ids) = state::load_with_repairs(&store, default_cycle_type);
        let mut storage = Self {
            store: Box::new(store),
            state,
            audit: None,
            paths: None,
        };
        if repaired_ids > 0 {
            match storage.save() {
                Ok(()) => info!(repaired_ids, "Saved backfilled ids"),
                Err(e) => warn!(error = %e, "Failed to save backfilled ids"),
            }
        }
        storage
    }

    /// Empty in-memory ledger with a monthly cycle starting today
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new(), CycleType::default())
    }

    /// Attach an audit logger
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LedgerState {
        &mut self.state
    }

    pub fn paths(&self) -> Option<&CyclebookPaths> {
        self.paths.as_ref()
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Write the whole state to the backing store
    pub fn save(&mut self) -> CyclebookResult<()> {
        state::save(self.store.as_mut(), &self.state)
    }

    /// Discard in-memory changes and reload from the backing store
    pub fn reload(&mut self) {
        let cycle_type = self.state.cycle.cycle_type;
        self.state = state::load(self.store.as_ref(), cycle_type);
        info!("Reloaded ledger state");
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.write_audit(|| AuditEntry::create(entity_type, entity_id, entity_name, entity));
    }

    /// Log an update, summarizing the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        self.write_audit(|| {
            let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
                (Ok(b), Ok(a)) => generate_diff(&b, &a),
                _ => None,
            };
            AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff)
        });
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.write_audit(|| AuditEntry::delete(entity_type, entity_id, entity_name, entity));
    }

    /// Log a finalized cycle with its totals
    pub fn log_archive(&self, record: &HistoryRecord) {
        self.write_audit(|| {
            let summary = serde_json::json!({
                "cycleStart": record.cycle_start,
                "cycleType": record.cycle_type,
                "startingBudget": record.starting_budget,
                "totalIncome": record.total_income,
                "totalExpenses": record.total_expenses,
                "netFlow": record.net_flow,
                "transactions": record.transactions.len(),
            });
            AuditEntry::archive(record.id.to_string(), Some(record.label()), summary)
        });
    }

    /// Audit failures never undo a saved change; they are reported and skipped
    fn write_audit(&self, build: impl FnOnce() -> AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&build()) {
                warn!(error = %e, path = %logger.path().display(), "Failed to write audit entry");
            }
        }
    }
}
