//! Calendar month windows that report listings and exports are scoped to

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

/// A calendar month, e.g. 2024-03
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

/// Years accepted from clients
pub const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationErrors> {
        if !YEARS.contains(&year) {
            return Err(ValidationErrors::single(
                "year",
                format!("must be between {} and {}", YEARS.start(), YEARS.end()),
            ));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationErrors::single("month", "is not a valid calendar month"));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .unwrap_or_else(|| self.first_day())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Window used for per project work statistics.
    ///
    /// For the month `today` falls in this is the trailing 30 days, otherwise
    /// the whole month.
    pub fn statistics_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        if self.contains(today) {
            (today - Duration::days(30), today)
        } else {
            (self.first_day(), self.last_day())
        }
    }

    /// Monday to Friday dates of the month
    pub fn working_days(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(|day| self.contains(*day))
            .filter(|day| day.weekday().number_from_monday() <= 5)
            .collect()
    }
}

impl std::fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
