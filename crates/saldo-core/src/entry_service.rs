//! Ledger Store operations over the entry collection.

use uuid::Uuid;

use saldo_domain::{Entry, EntryDraft, Identifiable, Ledger};

use crate::CoreError;

/// Adds, replaces and removes entries. Category existence is checked by the
/// caller before any of these run.
pub struct EntryService;

impl EntryService {
    /// Stores a new entry and returns its identifier.
    pub fn add(ledger: &mut Ledger, draft: EntryDraft) -> Result<Uuid, CoreError> {
        Self::validate(&draft)?;
        let id = Uuid::new_v4();
        let sequence = ledger.allocate_sequence();
        ledger.entries.push(Entry::from_draft(id, sequence, draft));
        ledger.touch();
        Ok(id)
    }

    /// Replaces all user-editable fields of an entry at once.
    pub fn update(ledger: &mut Ledger, id: Uuid, draft: EntryDraft) -> Result<(), CoreError> {
        Self::validate(&draft)?;
        let entry = ledger
            .entry_mut(id)
            .ok_or(CoreError::EntryNotFound(id))?;
        entry.replace(draft);
        ledger.touch();
        Ok(())
    }

    /// Deletes an entry, returning the removed value.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<Entry, CoreError> {
        let index = ledger
            .entries
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or(CoreError::EntryNotFound(id))?;
        let removed = ledger.entries.remove(index);
        ledger.touch();
        Ok(removed)
    }

    pub fn get(ledger: &Ledger, id: Uuid) -> Option<&Entry> {
        ledger.entry(id)
    }

    /// Every stored entry, in no particular order.
    pub fn list_all(ledger: &Ledger) -> &[Entry] {
        &ledger.entries
    }

    /// Rejects drafts before they reach the store.
    pub fn validate(draft: &EntryDraft) -> Result<(), CoreError> {
        if !draft.amount.is_finite() {
            return Err(CoreError::Validation("amount must be a number".into()));
        }
        if draft.amount <= 0.0 {
            return Err(CoreError::Validation(format!(
                "amount must be greater than zero, got {:.2}",
                draft.amount
            )));
        }
        if draft.category.trim().is_empty() {
            return Err(CoreError::Validation("category is required".into()));
        }
        Ok(())
    }
}
