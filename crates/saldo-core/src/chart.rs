//! Step-function balance series for chart adapters.

use chrono::NaiveDate;
use serde::Serialize;

use saldo_domain::WindowReport;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub balance: f64,
}

/// Builds the plotted balance for a window as a step function.
///
/// The series opens at the window start with the opening balance. Each entry
/// contributes two points on its date: the level held until then, then the
/// new balance. A final point carries the closing balance to the window end.
pub fn step_series(report: &WindowReport) -> Vec<ChartPoint> {
    let mut points = Vec::with_capacity(report.rows.len() * 2 + 2);
    let mut level = report.opening_balance;
    points.push(ChartPoint {
        date: report.window.start(),
        balance: level,
    });
    for row in &report.rows {
        let date = row.entry.date();
        points.push(ChartPoint {
            date,
            balance: level,
        });
        level = row.running_balance;
        points.push(ChartPoint {
            date,
            balance: level,
        });
    }
    points.push(ChartPoint {
        date: report.window.end(),
        balance: level,
    });
    points
}
