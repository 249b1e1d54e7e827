use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Billing period: a calendar month, normalized to its first day.
///
/// All reading and invoice lookups key on this granularity, so the newtype
/// guarantees the day component can never leak into uniqueness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingPeriod(NaiveDate);

impl BillingPeriod {
    /// Create a period from any date within the month
    pub fn new(date: NaiveDate) -> Self {
        let first = date
            .with_day(1)
            .expect("day 1 is valid for every month");
        Self(first)
    }

    pub fn from_ymd(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// First day of the month as a plain date
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The immediately preceding billing period
    pub fn previous(&self) -> Self {
        let prev = self
            .0
            .checked_sub_months(Months::new(1))
            .expect("month arithmetic stays in range for billing dates");
        Self(prev)
    }

    /// The immediately following billing period
    pub fn next(&self) -> Self {
        let next = self
            .0
            .checked_add_months(Months::new(1))
            .expect("month arithmetic stays in range for billing dates");
        Self(next)
    }
}

impl From<NaiveDate> for BillingPeriod {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for BillingPeriod {
    type Err = String;

    /// Parse the `YYYY-MM` form used by chat commands and reports
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid period format: {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid period year: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid period month: {}", s))?;
        Self::from_ymd(year, month).ok_or_else(|| format!("Invalid period: {}", s))
    }
}
