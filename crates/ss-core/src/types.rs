//! Common value types

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Amount of work, kept in whole minutes.
///
/// Renders as `HH:MM`; hours keep counting past 24 so totals read as
/// `37:15` rather than a day count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkHours(i64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkHoursParseError {
    #[error("'{0}' is not a valid duration, expected HH:MM or decimal hours")]
    Malformed(String),
    #[error("minutes must be between 0 and 59")]
    MinutesOutOfRange,
    #[error("duration can not be negative")]
    Negative,
}

impl WorkHours {
    /// Smallest amount a single report may carry
    pub const MIN_REPORT: WorkHours = WorkHours(1);
    /// Largest amount a single report may carry
    pub const MAX_REPORT: WorkHours = WorkHours(MINUTES_PER_DAY);
    /// Upper bound for one author on one day
    pub const MAX_DAILY: WorkHours = WorkHours(MINUTES_PER_DAY);
    pub const ZERO: WorkHours = WorkHours(0);

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes)
    }

    pub const fn from_hm(hours: i64, minutes: i64) -> Self {
        Self(hours * MINUTES_PER_HOUR + minutes)
    }

    /// `None` when the total does not fit
    pub fn checked_from_hm(hours: i64, minutes: i64) -> Option<Self> {
        hours
            .checked_mul(MINUTES_PER_HOUR)
            .and_then(|total| total.checked_add(minutes))
            .map(Self)
    }

    /// Decimal hours (`7.5`) rounded to the nearest minute
    pub fn from_decimal_hours(hours: f64) -> Result<Self, WorkHoursParseError> {
        if !hours.is_finite() {
            return Err(WorkHoursParseError::Malformed(hours.to_string()));
        }
        if hours < 0.0 {
            return Err(WorkHoursParseError::Negative);
        }
        Ok(Self((hours * MINUTES_PER_HOUR as f64).round() as i64))
    }

    pub const fn minutes(&self) -> i64 {
        self.0
    }

    pub fn as_decimal_hours(&self) -> f64 {
        self.0 as f64 / MINUTES_PER_HOUR as f64
    }

    /// Fraction of a day, the unit spreadsheets use for time cells
    pub fn as_day_fraction(&self) -> f64 {
        self.0 as f64 / MINUTES_PER_DAY as f64
    }

    pub fn is_valid_for_report(&self) -> bool {
        *self >= Self::MIN_REPORT && *self <= Self::MAX_REPORT
    }

    pub fn saturating_sub(self, other: WorkHours) -> WorkHours {
        WorkHours(self.0.saturating_sub(other.0).max(0))
    }

    /// True when adding `self` to `booked` goes past [`Self::MAX_DAILY`]
    pub fn exceeds_daily_limit(self, booked: WorkHours) -> bool {
        booked + self > Self::MAX_DAILY
    }

    /// Error shown when a day already holds `booked` and more was asked for
    pub fn daily_limit_message(booked: WorkHours) -> String {
        format!(
            "Daily limit of {} exceeded, {} left for this day.",
            Self::MAX_DAILY,
            Self::MAX_DAILY.saturating_sub(booked)
        )
    }
}

impl fmt::Display for WorkHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.0 / MINUTES_PER_HOUR,
            self.0 % MINUTES_PER_HOUR
        )
    }
}

impl FromStr for WorkHours {
    type Err = WorkHoursParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(WorkHoursParseError::Negative);
        }
        if let Some((hours, minutes)) = s.split_once(':') {
            let hours: i64 = hours
                .parse()
                .map_err(|_| WorkHoursParseError::Malformed(s.to_string()))?;
            let minutes: i64 = minutes
                .parse()
                .map_err(|_| WorkHoursParseError::Malformed(s.to_string()))?;
            if !(0..MINUTES_PER_HOUR).contains(&minutes) {
                return Err(WorkHoursParseError::MinutesOutOfRange);
            }
            return Self::checked_from_hm(hours, minutes)
                .ok_or_else(|| WorkHoursParseError::Malformed(s.to_string()));
        }
        let hours: f64 = s
            .parse()
            .map_err(|_| WorkHoursParseError::Malformed(s.to_string()))?;
        Self::from_decimal_hours(hours)
    }
}

impl Add for WorkHours {
    type Output = WorkHours;

    fn add(self, rhs: WorkHours) -> WorkHours {
        WorkHours(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for WorkHours {
    fn add_assign(&mut self, rhs: WorkHours) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for WorkHours {
    type Output = WorkHours;

    fn sub(self, rhs: WorkHours) -> WorkHours {
        WorkHours(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for WorkHours {
    fn sum<I: Iterator<Item = WorkHours>>(iter: I) -> WorkHours {
        iter.fold(WorkHours::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a WorkHours> for WorkHours {
    fn sum<I: Iterator<Item = &'a WorkHours>>(iter: I) -> WorkHours {
        iter.copied().sum()
    }
}

impl Serialize for WorkHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
            Raw::Number(hours) => WorkHours::from_decimal_hours(hours).map_err(de::Error::custom),
        }
    }
}
