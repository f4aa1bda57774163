//! Time source for date-bound rules.
//!
//! "Today" is the UTC calendar date. The engine never reads the system
//! clock directly; it asks its [`Clock`], so tests can pin the date.

use chrono::{NaiveDate, Utc};

/// Supplies the current UTC date.
pub trait Clock: Send + Sync {
    /// Today's date, UTC, midnight-truncated.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from calendar parts. Invalid dates fall back to 1970-01-01.
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::ymd(2025, 6, 15);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn test_fixed_clock_invalid_parts() {
        let clock = FixedClock::ymd(2025, 2, 30);
        assert_eq!(clock.today(), NaiveDate::default());
    }
}
