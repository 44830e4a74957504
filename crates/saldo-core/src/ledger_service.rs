//! Helper functions for whole-ledger setup and settings.

use saldo_domain::{Category, Ledger, DEFAULT_CATEGORIES};

use crate::CoreError;

/// Provides constructor and settings helpers for [`Ledger`] instances.
pub struct LedgerService;

impl LedgerService {
    /// Creates a ledger for first use: zero starting balance plus the
    /// default categories.
    pub fn initialize() -> Ledger {
        let mut ledger = Ledger::new();
        Self::seed_default_categories(&mut ledger);
        ledger
    }

    /// Adds any default category that is missing. Safe to run repeatedly;
    /// never duplicates or reorders existing labels. Returns how many labels
    /// were added.
    pub fn seed_default_categories(ledger: &mut Ledger) -> usize {
        let mut added = 0;
        for label in DEFAULT_CATEGORIES {
            if ledger.category(label).is_none() {
                ledger.categories.push(Category::new(label));
                added += 1;
            }
        }
        if added > 0 {
            ledger.touch();
        }
        added
    }

    pub fn set_starting_balance(ledger: &mut Ledger, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() {
            return Err(CoreError::Validation(
                "starting balance must be a number".into(),
            ));
        }
        ledger.starting_balance = value;
        ledger.touch();
        Ok(())
    }
}
