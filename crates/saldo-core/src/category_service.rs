use saldo_domain::{Category, Ledger};

use crate::CoreError;

/// Category Registry: the set of labels entries may be filed under.
pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, label: &str) -> Result<(), CoreError> {
        if label.trim().is_empty() {
            return Err(CoreError::Validation("category label is required".into()));
        }
        if Self::exists(ledger, label) {
            return Err(CoreError::DuplicateCategory(label.to_string()));
        }
        ledger.categories.push(Category::new(label));
        ledger.touch();
        Ok(())
    }

    /// Removes a category that no entry references.
    ///
    /// References are counted by scanning the current entries, so the check
    /// and the removal must run under the same lock as entry mutations.
    pub fn remove(ledger: &mut Ledger, label: &str) -> Result<(), CoreError> {
        let index = ledger
            .categories
            .iter()
            .position(|category| category.name == label)
            .ok_or_else(|| CoreError::CategoryNotFound(label.to_string()))?;
        let entries = Self::usage(ledger, label);
        if entries > 0 {
            return Err(CoreError::CategoryInUse {
                label: label.to_string(),
                entries,
            });
        }
        ledger.categories.remove(index);
        ledger.touch();
        Ok(())
    }

    /// Labels in creation order.
    pub fn list_all(ledger: &Ledger) -> Vec<&str> {
        ledger
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect()
    }

    pub fn exists(ledger: &Ledger, label: &str) -> bool {
        ledger.category(label).is_some()
    }

    /// Number of entries currently filed under `label`.
    pub fn usage(ledger: &Ledger, label: &str) -> usize {
        ledger
            .entries
            .iter()
            .filter(|entry| entry.category() == label)
            .count()
    }

    /// Fails with `CategoryNotFound` unless `label` is registered.
    pub fn require(ledger: &Ledger, label: &str) -> Result<(), CoreError> {
        if Self::exists(ledger, label) {
            Ok(())
        } else {
            Err(CoreError::CategoryNotFound(label.to_string()))
        }
    }
}
