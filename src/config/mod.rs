//! Configuration module for Cyclebook
//!
//! - Path resolution for settings, ledger data, audit log and exports
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::CyclebookPaths;
pub use settings::Settings;
