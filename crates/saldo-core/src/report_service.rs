//! Report window selection over the running ledger.

use chrono::NaiveDate;

use saldo_domain::{BalancedEntry, Entry, ReportWindow, WindowReport, WindowRow};

use crate::balance_service::BalanceService;

pub struct ReportService;

impl ReportService {
    /// Carves `window` out of an already ordered running ledger.
    ///
    /// `ordered` must be the output of [`BalanceService::running_ledger`].
    /// The opening balance is the running balance of the last entry dated
    /// strictly before the window, or `starting_balance` if there is none.
    pub fn select(
        ordered: &[BalancedEntry],
        starting_balance: f64,
        window: ReportWindow,
        today: NaiveDate,
    ) -> WindowReport {
        let opening_balance = ordered
            .iter()
            .take_while(|row| row.entry.date() < window.start())
            .last()
            .map(|row| row.running_balance)
            .unwrap_or(starting_balance);

        let rows = ordered
            .iter()
            .filter(|row| window.contains(row.entry.date()))
            .map(|row| WindowRow {
                entry: row.entry.clone(),
                running_balance: row.running_balance,
                is_future: row.entry.date() > today,
            })
            .collect();

        WindowReport {
            window,
            opening_balance,
            rows,
            evaluated_on: today,
        }
    }

    /// Runs the balance calculator and the selector in one step.
    pub fn window_report(
        entries: &[Entry],
        starting_balance: f64,
        window: ReportWindow,
        today: NaiveDate,
    ) -> WindowReport {
        let ordered = BalanceService::running_ledger(entries, starting_balance);
        Self::select(&ordered, starting_balance, window, today)
    }
}
