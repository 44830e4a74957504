//! Content and ordering contract for exported window reports.
//!
//! The document is rendered as fixed-width text. Page layout and binary
//! encodings are left to whatever adapter writes the final file.

use chrono::NaiveDate;
use serde::Serialize;

use saldo_domain::{Amounted, EntryKind, WindowReport};

use crate::table::BalanceTone;

/// Longest text field that fits the fixed-width layout.
pub const MAX_FIELD_CHARS: usize = 35;
const ELLIPSIS: &str = "..";

/// Whether a row is already booked or still lies ahead of the evaluation date.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Settlement {
    Settled,
    Projected,
}

impl Settlement {
    pub fn from_is_future(is_future: bool) -> Self {
        if is_future {
            Settlement::Projected
        } else {
            Settlement::Settled
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub running_balance: f64,
    pub settlement: Settlement,
    pub tone: BalanceTone,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportDocument {
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub opening_balance: f64,
    pub closing_balance: f64,
    pub rows: Vec<ExportRow>,
}

impl ExportDocument {
    /// Rows keep the window's order.
    pub fn from_window(title: impl Into<String>, report: &WindowReport) -> Self {
        let rows = report
            .rows
            .iter()
            .map(|row| ExportRow {
                date: row.entry.date(),
                kind: row.entry.kind(),
                description: truncate_field(row.entry.description()),
                category: truncate_field(row.entry.category()),
                amount: row.entry.amount(),
                running_balance: row.running_balance,
                settlement: Settlement::from_is_future(row.is_future),
                tone: BalanceTone::of(row.running_balance),
            })
            .collect();
        Self {
            title: title.into(),
            start: report.window.start(),
            end: report.window.end(),
            opening_balance: report.opening_balance,
            closing_balance: report.closing_balance(),
            rows,
        }
    }

    /// Renders the document as fixed-width text. Projected rows are flagged
    /// with `*` in the first column.
    pub fn render_text(&self, currency: &str) -> String {
        let mut lines = vec![
            self.title.clone(),
            format!("Period: {} - {}", self.start, self.end),
            format!(
                "Opening balance: {}",
                format_money(self.opening_balance, currency)
            ),
            String::new(),
            format!(
                "  {:<10}  {:<35}  {:<35}  {:>12}  {:>12}",
                "Date", "Description", "Category", "Amount", "Balance"
            ),
        ];
        lines.extend(self.rows.iter().map(|row| {
            let marker = match row.settlement {
                Settlement::Projected => '*',
                Settlement::Settled => ' ',
            };
            format!(
                "{} {:<10}  {:<35}  {:<35}  {:>12}  {:>12}",
                marker,
                row.date,
                row.description,
                row.category,
                format_money(row.amount, currency),
                format_money(row.running_balance, currency),
            )
        }));
        if self.rows.is_empty() {
            lines.push(format!(
                "  No entries in this period; balance remained at {}.",
                format_money(self.opening_balance, currency)
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "Closing balance: {}",
            format_money(self.closing_balance, currency)
        ));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Shortens text longer than [`MAX_FIELD_CHARS`] to fit the layout, ending
/// it with a two-character ellipsis.
pub fn truncate_field(text: &str) -> String {
    if text.chars().count() <= MAX_FIELD_CHARS {
        return text.to_string();
    }
    let keep = MAX_FIELD_CHARS - ELLIPSIS.len();
    let mut short: String = text.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    short
}

pub fn format_money(amount: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{amount:.2}")
    } else {
        format!("{currency} {amount:.2}")
    }
}
