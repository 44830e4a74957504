#![doc(test(attr(deny(warnings))))]

//! Saldo keeps a single personal ledger of dated income and expense entries
//! and answers two questions about it: what the balance is after every
//! entry, and what a forward-looking report window holds.

pub mod book;
pub mod cli;
pub mod errors;
pub mod utils;

pub use book::Book;
pub use errors::SaldoError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Saldo tracing initialized.");
    });
}
