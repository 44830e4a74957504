//! saldo-core
//!
//! Business rules for the Saldo ledger: entry and category invariants, the
//! running balance calculator, and the report window selector.
//! Depends on saldo-domain. No CLI, no terminal I/O, no direct file access.

pub mod balance_service;
pub mod category_service;
pub mod chart;
pub mod entry_service;
pub mod error;
pub mod export;
pub mod ledger_service;
pub mod report_service;
pub mod storage;
pub mod table;
pub mod time;

#[cfg(test)]
mod tests;

pub use balance_service::*;
pub use category_service::*;
pub use entry_service::*;
pub use error::CoreError;
pub use ledger_service::*;
pub use report_service::*;
pub use time::Clock;
