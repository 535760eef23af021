//! Key-value persistence boundary
//!
//! The ledger is persisted as a handful of textual entries under fixed keys.
//! [`KeyValueStore`] hides where those entries actually live.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::file_io::{read_json, write_json_atomic};
use crate::error::CyclebookResult;

pub const KEY_COMPANY_NAME: &str = "cyclebook_company_name";
pub const KEY_CYCLE_TYPE: &str = "cyclebook_cycle_type";
pub const KEY_CATEGORY_BUDGETS: &str = "cyclebook_category_budgets";
pub const KEY_CURRENT_TRANSACTIONS: &str = "cyclebook_current_transactions";
pub const KEY_CYCLE_HISTORY: &str = "cyclebook_cycle_history";
pub const KEY_CURRENT_CYCLE_START: &str = "cyclebook_current_cycle_start";

/// A string-keyed store of string values
pub trait KeyValueStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> CyclebookResult<Option<String>>;

    /// Write a value
    fn set(&mut self, key: &str, value: String) -> CyclebookResult<()>;

    /// Write several values
    ///
    /// Implementations backed by a file override this to write once.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> CyclebookResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-memory store, used in tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CyclebookResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CyclebookResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file
///
/// The whole file is read once on open; every write rewrites it atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file doesn't exist
    pub fn open(path: impl Into<PathBuf>) -> CyclebookResult<Self> {
        let path = path.into();
        let entries: BTreeMap<String, String> = read_json(&path)?;
        debug!(path = %path.display(), keys = entries.len(), "Opened key-value store");
        Ok(Self { path, entries })
    }

    /// An empty store that will overwrite whatever is at `path` on first write
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> CyclebookResult<()> {
        write_json_atomic(&self.path, &self.entries)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> CyclebookResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CyclebookResult<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> CyclebookResult<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value);
        }
        self.flush()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> CyclebookResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> CyclebookResult<()> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> CyclebookResult<()> {
        (**self).set_many(entries)
    }
}
