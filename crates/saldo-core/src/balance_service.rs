//! Running balance calculation.

use saldo_domain::{round_currency, Amounted, BalancedEntry, Entry};

/// Turns an unordered set of entries into a chronological running balance.
pub struct BalanceService;

impl BalanceService {
    /// Orders entries by date, breaking ties by creation order, and pairs each
    /// with the balance after it was applied.
    ///
    /// The cumulative sum is carried unrounded; each reported balance is
    /// `round(starting_balance + sum)` at that step.
    pub fn running_ledger(entries: &[Entry], starting_balance: f64) -> Vec<BalancedEntry> {
        let mut ordered: Vec<&Entry> = entries.iter().collect();
        ordered.sort_by_key(|entry| (entry.date(), entry.sequence()));

        let mut cumulative = 0.0;
        ordered
            .into_iter()
            .map(|entry| {
                cumulative += entry.amount();
                BalancedEntry {
                    entry: entry.clone(),
                    running_balance: round_currency(starting_balance + cumulative),
                }
            })
            .collect()
    }

    /// Balance after every entry, including future-dated ones. Equals the
    /// starting balance for an empty ledger.
    pub fn current_total(entries: &[Entry], starting_balance: f64) -> f64 {
        Self::running_ledger(entries, starting_balance)
            .last()
            .map(|row| row.running_balance)
            .unwrap_or(starting_balance)
    }
}
