//! Date handling for folder names
//!
//! Folder names in a document archive are free-text administrative labels
//! ("2023-05-10", "Möten 2022", "2019-2021"). This module turns them into
//! inclusive calendar intervals that can be compared against the operator's
//! requested range.

mod parser;

pub use parser::{DateRangeParser, DateRule, FolderDate};

use chrono::{Local, NaiveDate};
use std::fmt;

/// Inclusive calendar interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// Creates an interval without reordering the bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Creates an interval covering exactly one day
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The widest interval a folder name can imply: `[1970-01-01, today]`
    pub fn full_range(today: NaiveDate) -> Self {
        Self {
            start: epoch(),
            end: today,
        }
    }

    /// Returns true if the interval covers a single calendar day
    pub fn is_exact_day(&self) -> bool {
        self.start == self.end
    }

    /// Inclusive overlap test; intervals that only touch at a boundary overlap
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns true if `start <= end`
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} .. {}", self.start, self.end)
        }
    }
}

/// 1970-01-01 (chrono's default date)
pub fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// The current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
