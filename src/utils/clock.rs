use chrono::{DateTime, Local, NaiveDate, Utc};

use saldo_core::Clock;

/// Wall clock. "Today" follows the local calendar so entries dated today
/// count as settled for the user who entered them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
