//! Read-only values derived from the ledger: balanced entries and report windows.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{
    common::{round_currency, Amounted, DAYS_PER_WINDOW_MONTH},
    entry::{Entry, EntryKind},
};

/// An entry paired with the running balance after it was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancedEntry {
    pub entry: Entry,
    pub running_balance: f64,
}

/// A balanced entry inside a report window, classified against "today".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRow {
    pub entry: Entry,
    pub running_balance: f64,
    /// `true` when the entry is dated after the evaluation date.
    pub is_future: bool,
}

/// Inclusive date range used to slice the ledger for charts and exports.
///
/// A "month" is a block of 30 days; `end = start + 30 * months`, clamped to
/// the last representable date.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ReportWindow {
    start: NaiveDate,
    end: NaiveDate,
    months: u32,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, months: u32) -> Self {
        let days = DAYS_PER_WINDOW_MONTH * u64::from(months);
        let end = start
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end, months }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Output of the window selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub window: ReportWindow,
    /// Running balance that held immediately before the window opened.
    pub opening_balance: f64,
    pub rows: Vec<WindowRow>,
    /// Date the `is_future` flags were computed against.
    pub evaluated_on: NaiveDate,
}

impl WindowReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Balance at the end of the window; the opening balance when no entry
    /// falls inside it.
    pub fn closing_balance(&self) -> f64 {
        self.rows
            .last()
            .map(|row| row.running_balance)
            .unwrap_or(self.opening_balance)
    }

    pub fn net_change(&self) -> f64 {
        round_currency(self.closing_balance() - self.opening_balance)
    }

    pub fn income_total(&self) -> f64 {
        self.total_for(EntryKind::Income)
    }

    /// Sum of expenses inside the window, as a negative number.
    pub fn expense_total(&self) -> f64 {
        self.total_for(EntryKind::Expense)
    }

    pub fn projected_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.is_future).count()
    }

    fn total_for(&self, kind: EntryKind) -> f64 {
        let sum: f64 = self
            .rows
            .iter()
            .filter(|row| row.entry.kind() == kind)
            .map(|row| row.entry.amount())
            .sum();
        round_currency(sum)
    }
}
