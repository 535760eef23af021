//! Audit logging for Cyclebook
//!
//! Every mutation of the ledger (transactions added or deleted, budgets and
//! settings changed, cycles archived) is appended to a line-delimited JSON
//! log with before/after values.
//!
//! - `AuditEntry`: one logged change
//! - `AuditLogger`: appends entries to the log file and reads them back
//! - `generate_diff`: human-readable summary of changed fields

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
