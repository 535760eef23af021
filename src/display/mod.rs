//! Display formatting for terminal output
//!
//! Plain-text helpers shared by the reports and the CLI.

pub mod category;
pub mod report;
pub mod transaction;

pub use category::format_category_tree;
pub use transaction::{format_transaction_details, format_transaction_register, format_transaction_row};
