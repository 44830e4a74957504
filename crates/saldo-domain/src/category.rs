//! Domain types representing entry categories.

use serde::{Deserialize, Serialize};

/// Labels seeded into a freshly initialised ledger.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Salary", "Groceries", "Rent", "Leisure"];

/// A user-defined label that entries are filed under. Labels compare
/// case-sensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
