//! Calendar periods used by the reports
//!
//! `MonthPeriod` is one calendar month; `DateRange` is an arbitrary half-open
//! `[start, end)` span of dates. Both are validated on construction so the
//! date arithmetic behind them never fails afterwards.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of dates, `start` inclusive and `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `end` must not be before `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering an inclusive `[first, last]` pair of days
    pub fn inclusive(first: NaiveDate, last: NaiveDate) -> Result<Self, PeriodError> {
        let end = last
            .succ_opt()
            .ok_or(PeriodError::OutOfRange(last.year()))?;
        Self::new(first, end)
    }

    /// The whole calendar year
    pub fn year(year: i32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(PeriodError::OutOfRange(year))?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or(PeriodError::OutOfRange(year))?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Number of days covered
    pub fn days(&self) -> u32 {
        (self.end - self.start).num_days().max(0) as u32
    }

    /// The last day inside the range, if the range is not empty
    pub fn last_day(&self) -> Option<NaiveDate> {
        if self.end > self.start {
            self.end.pred_opt()
        } else {
            None
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_day() {
            Some(last) => write!(f, "{} to {}", self.start, last),
            None => write!(f, "{} (empty)", self.start),
        }
    }
}

/// One calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthPeriod {
    /// Create a monthly period
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::OutOfRange(year))?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(PeriodError::OutOfRange(year))?;
        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// The month a date falls in
    pub fn containing(date: NaiveDate) -> Result<Self, PeriodError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month (exclusive bound)
    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// The month as a half-open date range
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Number of days in the month
    pub fn days(&self) -> u32 {
        self.range().days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range().contains(date)
    }

    /// Get the previous month
    pub fn prev(&self) -> Result<Self, PeriodError> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Get the next month
    pub fn next(&self) -> Result<Self, PeriodError> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Parse a "YYYY-MM" string
    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthPeriod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error type for period construction and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    InvalidFormat(String),
    InvalidMonth(u32),
    OutOfRange(i32),
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid period format: {} (expected YYYY-MM)", s),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            Self::OutOfRange(y) => write!(f, "Year out of supported range: {}", y),
            Self::InvertedRange { start, end } => {
                write!(f, "Range end {} is before start {}", end, start)
            }
        }
    }
}

impl std::error::Error for PeriodError {}
