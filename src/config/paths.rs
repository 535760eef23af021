//! Path management for Cyclebook
//!
//! ## Path Resolution Order
//!
//! 1. `CYCLEBOOK_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/cyclebook` on Linux,
//!    `~/Library/Application Support/cyclebook` on macOS, `%APPDATA%` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{CyclebookError, CyclebookResult};

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "CYCLEBOOK_DATA_DIR";

/// Manages all paths used by Cyclebook
#[derive(Debug, Clone)]
pub struct CyclebookPaths {
    base_dir: PathBuf,
}

impl CyclebookPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> CyclebookResult<Self> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the ledger data
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for CSV exports
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// The key-value store file
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> CyclebookResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CyclebookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| CyclebookError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether any ledger data has been written yet
    pub fn is_initialized(&self) -> bool {
        self.ledger_file().exists()
    }
}

fn resolve_default_path() -> CyclebookResult<PathBuf> {
    ProjectDirs::from("", "", "cyclebook")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CyclebookError::Config("Could not determine a home directory".into()))
}
