//! Domain models for dated income and expense entries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Direction of money flow for an entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Applies the kind's sign to an unsigned magnitude.
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            EntryKind::Income => magnitude.abs(),
            EntryKind::Expense => -magnitude.abs(),
        }
    }

    /// Returns `true` when `amount` carries the sign this kind requires.
    /// Zero is accepted for both kinds.
    pub fn agrees_with(self, amount: f64) -> bool {
        match self {
            EntryKind::Income => amount >= 0.0,
            EntryKind::Expense => amount <= 0.0,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Caller-supplied values for creating or fully replacing an entry.
///
/// `amount` is the unsigned magnitude as typed by the user; the stored sign
/// always comes from `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    pub category: String,
}

impl EntryDraft {
    pub fn new(
        date: NaiveDate,
        kind: EntryKind,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            kind,
            amount,
            description: String::new(),
            category: category.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A stored ledger entry.
///
/// Fields are private so the sign of `amount` can only be derived from
/// `kind`. Deserialisation rejects records where the two disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    id: Uuid,
    sequence: u64,
    date: NaiveDate,
    kind: EntryKind,
    amount: f64,
    description: String,
    category: String,
}

impl Entry {
    /// Builds an entry from a draft, deriving the amount's sign from its kind.
    pub fn from_draft(id: Uuid, sequence: u64, draft: EntryDraft) -> Self {
        Self {
            id,
            sequence,
            date: draft.date,
            kind: draft.kind,
            amount: draft.kind.signed(draft.amount),
            description: draft.description,
            category: draft.category,
        }
    }

    /// Replaces every user-editable field at once. Identity and creation
    /// order are preserved.
    pub fn replace(&mut self, draft: EntryDraft) {
        *self = Self::from_draft(self.id, self.sequence, draft);
    }

    /// Position of this entry in creation order. Breaks ties between entries
    /// that share a date.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Unsigned magnitude, suitable for prefilling an edit form.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Returns the entry as a draft carrying the same values.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            date: self.date,
            kind: self.kind,
            amount: self.magnitude(),
            description: self.description.clone(),
            category: self.category.clone(),
        }
    }
}

impl Identifiable for Entry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Entry {
    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    id: Uuid,
    sequence: u64,
    date: NaiveDate,
    kind: EntryKind,
    amount: f64,
    #[serde(default)]
    description: String,
    category: String,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = String;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        if !record.amount.is_finite() {
            return Err(format!("entry {} has a non-finite amount", record.id));
        }
        if !record.kind.agrees_with(record.amount) {
            return Err(format!(
                "entry {} is {} but carries amount {}",
                record.id, record.kind, record.amount
            ));
        }
        Ok(Self {
            id: record.id,
            sequence: record.sequence,
            date: record.date,
            kind: record.kind,
            amount: record.amount,
            description: record.description,
            category: record.category,
        })
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            sequence: entry.sequence,
            date: entry.date,
            kind: entry.kind,
            amount: entry.amount,
            description: entry.description,
            category: entry.category,
        }
    }
}
