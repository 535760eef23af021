//! User settings for Cyclebook
//!
//! Preferences that live outside the ledger itself: the cycle type used for
//! a brand-new ledger, display formatting, auditing and log verbosity.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::CyclebookPaths;
use crate::error::{CyclebookError, CyclebookResult};
use crate::models::CycleType;

/// User settings for Cyclebook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Cycle type for a ledger that has none stored yet
    #[serde(default)]
    pub default_cycle_type: CycleType,

    /// Date format for display (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether mutations are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// `tracing` filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

fn default_log_filter() -> String {
    "cyclebook=info".to_string()
}

/// Whether `format` is a non-empty strftime pattern chrono can render
pub fn is_valid_date_format(format: &str) -> bool {
    !format.trim().is_empty()
        && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_cycle_type: CycleType::default(),
            date_format: default_date_format(),
            audit_enabled: default_audit_enabled(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    ///
    /// A `date_format` that chrono cannot render is a configuration error.
    pub fn load_or_create(paths: &CyclebookPaths) -> CyclebookResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not written until the caller asks
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CyclebookError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| CyclebookError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the fields serde cannot check on its own
    pub fn validate(&self) -> CyclebookResult<()> {
        if !is_valid_date_format(&self.date_format) {
            return Err(CyclebookError::Config(format!(
                "Invalid date_format '{}' in settings file (e.g. \"{}\")",
                self.date_format,
                default_date_format()
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CyclebookPaths) -> CyclebookResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CyclebookError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CyclebookError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
