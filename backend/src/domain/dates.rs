//! Calendar helpers for the ledger.
//!
//! All ledger dates are naive calendar dates. Nothing here looks at a time of
//! day or a timezone except [`today`], which reads the local calendar date once.

use chrono::{Datelike, Days, Local, NaiveDate};
use shared::AutopayCadence;
use std::fmt;

use crate::domain::errors::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    let well_formed = trimmed.len() == 10
        && trimmed
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(ValidationError::MalformedDate(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::MalformedDate(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// A calendar month, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedMonthKey(value.to_string());
        let trimmed = value.trim();
        let (year, month) = trimmed.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month).ok_or_else(malformed)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // year/month are range-checked at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Whether `date` falls in `[first day, first day of next month)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// e.g. "April"
    pub fn long_name(&self) -> String {
        self.first_day().format("%B").to_string()
    }

    /// e.g. "Apr"
    pub fn short_name(&self) -> String {
        self.first_day().format("%b").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The `count` months ending at `current`, oldest first
pub fn trailing_months(current: MonthKey, count: usize) -> Vec<MonthKey> {
    let mut months = Vec::with_capacity(count);
    let mut cursor = current;
    for _ in 0..count {
        months.push(cursor);
        cursor = cursor.previous();
    }
    months.reverse();
    months
}

/// Move one month forward, landing on `anchor_day` or on the last day of the
/// target month when the anchor does not exist there.
pub fn add_one_month(date: NaiveDate, anchor_day: u32) -> Option<NaiveDate> {
    let target = MonthKey::of(date).next();
    let day = anchor_day.clamp(1, target.days());
    NaiveDate::from_ymd_opt(target.year(), target.month(), day)
}

/// The occurrence after `date` for the given cadence. `None` only when the
/// calendar runs out of range.
pub fn advance_by_cadence(date: NaiveDate, cadence: AutopayCadence, anchor_day: u32) -> Option<NaiveDate> {
    match cadence {
        AutopayCadence::Daily => date.checked_add_days(Days::new(1)),
        AutopayCadence::Weekly => date.checked_add_days(Days::new(7)),
        AutopayCadence::Fortnightly => date.checked_add_days(Days::new(15)),
        AutopayCadence::Monthly => add_one_month(date, anchor_day),
    }
}
