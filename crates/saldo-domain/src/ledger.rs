//! The persisted ledger snapshot: entries, categories and the starting balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::Identifiable, entry::Entry};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Complete state of one personal ledger. Holds no derived values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub starting_balance: f64,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub next_sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates an empty ledger with a zero starting balance and no categories.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            starting_balance: 0.0,
            categories: Vec::new(),
            entries: Vec::new(),
            next_sequence: 0,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Hands out the next creation-order number. Never reuses a value, even
    /// when the stored counter lags behind the entries on disk.
    pub fn allocate_sequence(&mut self) -> u64 {
        let floor = self
            .entries
            .iter()
            .map(|entry| entry.sequence() + 1)
            .max()
            .unwrap_or(0);
        let sequence = self.next_sequence.max(floor);
        self.next_sequence = sequence + 1;
        sequence
    }

    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
