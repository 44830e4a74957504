//! saldo-domain
//!
//! Pure domain models (Entry, Category, Ledger, annotated report rows).
//! No I/O, no CLI, no storage. Only data types and the money rounding rule.

pub mod category;
pub mod common;
pub mod entry;
pub mod ledger;
pub mod report;

pub use category::*;
pub use common::*;
pub use entry::*;
pub use ledger::*;
pub use report::*;
