use colored::Colorize;

use saldo_core::{
    chart::ChartPoint,
    export::{format_money, MAX_FIELD_CHARS},
    storage::BackupInfo,
    table::{BalanceTone, TableRow},
};
use saldo_domain::WindowReport;

use crate::cli::table_renderer::{Table, TableColumn};

const CHART_WIDTH: usize = 40;

pub fn tone_money(amount: f64, currency: &str) -> String {
    let text = format_money(amount, currency);
    match BalanceTone::of(amount) {
        BalanceTone::Positive => text.green().to_string(),
        BalanceTone::Negative => text.red().to_string(),
    }
}

/// Running ledger table: one line per entry, balance coloured by tone.
pub fn ledger_table(rows: &[TableRow], currency: &str) -> String {
    let with_status = rows.iter().any(|row| row.is_future.is_some());
    let mut columns = vec![
        TableColumn::left("Date"),
        TableColumn::left("Kind"),
        TableColumn::right("Amount"),
        TableColumn::left("Category").max_width(MAX_FIELD_CHARS),
        TableColumn::left("Description").max_width(MAX_FIELD_CHARS),
        TableColumn::right("Balance"),
    ];
    if with_status {
        columns.push(TableColumn::left("Status"));
    }
    columns.push(TableColumn::left("Id"));

    let mut table = Table::new(columns);
    for row in rows {
        let balance = match row.tone {
            BalanceTone::Positive => format_money(row.running_balance, currency).green(),
            BalanceTone::Negative => format_money(row.running_balance, currency).red(),
        };
        let mut cells = vec![
            row.date.to_string(),
            row.kind.to_string(),
            format_money(row.amount, currency),
            row.category.clone(),
            row.description.clone(),
            balance.to_string(),
        ];
        if with_status {
            let status = match row.is_future {
                Some(true) => "projected",
                _ => "settled",
            };
            cells.push(status.to_string());
        }
        cells.push(row.id.to_string());
        table.push(cells);
    }
    table.render()
}

pub fn report_summary(report: &WindowReport, currency: &str) -> String {
    let window = &report.window;
    let mut lines = vec![
        format!(
            "Window: {} to {} ({} x 30 days), evaluated on {}",
            window.start(), window.end(), window.months(), report.evaluated_on
        ),
        format!(
            "Opening balance: {}",
            tone_money(report.opening_balance, currency)
        ),
    ];
    if report.is_empty() {
        lines.push("No entries in this window.".to_string());
    }
    lines.push(format!(
        "Income: {}  Expenses: {}  Net: {}",
        format_money(report.income_total(), currency),
        format_money(report.expense_total(), currency),
        format_money(report.net_change(), currency)
    ));
    lines.push(format!(
        "Closing balance: {}",
        tone_money(report.closing_balance(), currency)
    ));
    if report.projected_rows() > 0 {
        lines.push(format!("Projected entries: {}", report.projected_rows()));
    }
    lines.join("\n")
}

/// Horizontal bar per step point, scaled against the largest magnitude.
pub fn render_chart(points: &[ChartPoint], currency: &str) -> String {
    let peak = points
        .iter()
        .map(|point| point.balance.abs())
        .fold(0.0_f64, f64::max);

    points
        .iter()
        .map(|point| {
            let length = if peak > 0.0 {
                ((point.balance.abs() / peak) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar = "#".repeat(length);
            let bar = match BalanceTone::of(point.balance) {
                BalanceTone::Positive => bar.green(),
                BalanceTone::Negative => bar.red(),
            };
            format!(
                "{}  {:>14}  {}",
                point.date,
                format_money(point.balance, currency),
                bar
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn backup_lines(backups: &[BackupInfo]) -> String {
    backups
        .iter()
        .map(|info| {
            let when = info
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown time".to_string());
            format!("{when}  {:>8} bytes  {}", info.size_bytes, info.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
