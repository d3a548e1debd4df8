//! Running financial counters with daily rollover.

use rust_decimal::Decimal;
use time::Date;

/// Process-wide counters, owned by the driver and mutated only on its
/// thread of control.
///
/// Two lifecycles are layered together: `scans`, `total_profit`, and
/// `invested` accumulate for the life of the process, while `opps`,
/// `successful_trades`, and `daily_profit` reset at UTC date rollover.
/// `total_profit` always equals the sum of every closed day's
/// `daily_profit` plus the running current day, because both profit fields
/// move only through [`Ledger::record_fill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Scan ticks since process start.
    pub scans: u64,
    /// Opportunities detected today.
    pub opps: u64,
    /// Trades fully executed today.
    pub successful_trades: u64,
    /// Profit booked today.
    pub daily_profit: Decimal,
    /// Profit booked since process start.
    pub total_profit: Decimal,
    /// Capital spent on filled legs since process start.
    pub invested: Decimal,
    /// The UTC day the daily fields belong to.
    current_date: Date,
}

/// Snapshot of one day's results, produced at rollover and on shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    /// The day the snapshot covers.
    pub date: Date,
    /// Profit booked that day.
    pub daily_profit: Decimal,
    /// Cumulative profit at snapshot time.
    pub total_profit: Decimal,
    /// Opportunities detected that day.
    pub opps: u64,
    /// Trades fully executed that day.
    pub successful_trades: u64,
    /// Cumulative capital invested at snapshot time.
    pub invested: Decimal,
}

impl Ledger {
    /// Create a zeroed ledger whose daily fields belong to `today`.
    pub fn new(today: Date) -> Self {
        Self {
            scans: 0,
            opps: 0,
            successful_trades: 0,
            daily_profit: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            invested: Decimal::ZERO,
            current_date: today,
        }
    }

    /// The UTC day the daily fields currently belong to.
    pub fn current_date(&self) -> Date {
        self.current_date
    }

    /// Count one scan tick.
    pub fn record_scan(&mut self) {
        self.scans += 1;
    }

    /// Count one detected opportunity.
    pub fn record_opportunity(&mut self) {
        self.opps += 1;
    }

    /// Book one fully executed trade: daily and cumulative profit, invested
    /// capital, and the trade counter move together or not at all.
    pub fn record_fill(&mut self, profit: Decimal, cost: Decimal) {
        self.daily_profit += profit;
        self.total_profit += profit;
        self.invested += cost;
        self.successful_trades += 1;
    }

    /// Snapshot the current day without resetting anything.
    pub fn snapshot(&self) -> DailyReport {
        DailyReport {
            date: self.current_date,
            daily_profit: self.daily_profit,
            total_profit: self.total_profit,
            opps: self.opps,
            successful_trades: self.successful_trades,
            invested: self.invested,
        }
    }

    /// Close the day if `today` has moved past the ledger's current day.
    ///
    /// Returns the snapshot of the day that just ended (for reporting)
    /// after zeroing the daily fields and advancing the date. Cumulative
    /// fields are untouched. Returns `None` while the day is unchanged.
    pub fn close_day(&mut self, today: Date) -> Option<DailyReport> {
        if today == self.current_date {
            return None;
        }

        let report = self.snapshot();

        self.opps = 0;
        self.successful_trades = 0;
        self.daily_profit = Decimal::ZERO;
        self.current_date = today;

        Some(report)
    }
}
