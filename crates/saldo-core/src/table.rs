//! Row projections consumed by table views.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use saldo_domain::{Amounted, BalancedEntry, EntryKind, Identifiable, WindowRow};

/// Styling class selected by the sign of a running balance.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BalanceTone {
    Positive,
    Negative,
}

impl BalanceTone {
    /// Zero counts as positive.
    pub fn of(balance: f64) -> Self {
        if balance < 0.0 {
            BalanceTone::Negative
        } else {
            BalanceTone::Positive
        }
    }
}

impl fmt::Display for BalanceTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BalanceTone::Positive => "positive",
            BalanceTone::Negative => "negative",
        };
        f.write_str(label)
    }
}

/// Flat, display-ready view of one ledger line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub running_balance: f64,
    pub tone: BalanceTone,
    pub is_future: Option<bool>,
}

impl From<&BalancedEntry> for TableRow {
    fn from(row: &BalancedEntry) -> Self {
        Self {
            id: row.entry.id(),
            date: row.entry.date(),
            kind: row.entry.kind(),
            amount: row.entry.amount(),
            description: row.entry.description().to_string(),
            category: row.entry.category().to_string(),
            running_balance: row.running_balance,
            tone: BalanceTone::of(row.running_balance),
            is_future: None,
        }
    }
}

impl From<&WindowRow> for TableRow {
    fn from(row: &WindowRow) -> Self {
        Self {
            id: row.entry.id(),
            date: row.entry.date(),
            kind: row.entry.kind(),
            amount: row.entry.amount(),
            description: row.entry.description().to_string(),
            category: row.entry.category().to_string(),
            running_balance: row.running_balance,
            tone: BalanceTone::of(row.running_balance),
            is_future: Some(row.is_future),
        }
    }
}

pub fn table_rows<'a, R>(rows: impl IntoIterator<Item = &'a R>) -> Vec<TableRow>
where
    R: 'a,
    TableRow: From<&'a R>,
{
    rows.into_iter().map(TableRow::from).collect()
}
