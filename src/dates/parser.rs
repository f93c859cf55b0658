use crate::dates::{today, DateInterval};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Tokens marking a name as descriptive ("fr.o.m. 2019", "until further
/// notice") rather than a literal date bound
const QUALIFIER_TOKENS: &[&str] = &["fr.o.m", "t.o.m", "from", "until"];

/// Lowest and highest year accepted for a lone four-digit token
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

// Each numeric pattern must account for every digit in the name, so a longer
// pattern is never shadowed by a shorter one.
static EXACT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\D*(\d{4})-(\d{2})-(\d{2})\D*$").expect("valid regex")
});

static YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\D*(\d{4})\s*-\s*(\d{4})\D*$").expect("valid regex"));

static SINGLE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\D*(\d{4})\D*$").expect("valid regex"));

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\D*(\d{4}-\d{2}-\d{2})\s*-\s*(\d{4}-\d{2}-\d{2})\D*$").expect("valid regex")
});

/// The naming rule that produced a folder's interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// Descriptive name such as "fr.o.m. 2019"
    Qualified,
    ExactDate,
    YearRange,
    SingleYear,
    DateRange,
    /// No usable date in the name
    Undated,
}

impl DateRule {
    /// Only a folder named after one calendar day hands its date down
    pub fn propagates(&self) -> bool {
        matches!(self, Self::ExactDate)
    }
}

/// Interval read from a folder name, with the rule that matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderDate {
    pub interval: DateInterval,
    pub rule: DateRule,
}

/// Extracts the date interval implied by a folder's display name
///
/// # Rule Order
///
/// The first matching rule wins:
///
/// | # | Name shape | Interval |
/// |---|------------|----------|
/// | 1 | contains `fr.o.m`, `t.o.m`, `from`, `until` | default |
/// | 2 | `YYYY-MM-DD` | that day |
/// | 3 | `YYYY-YYYY` | Jan 1 of first .. Dec 31 of second |
/// | 4 | words + `YYYY` (1900..=2100) | that calendar year |
/// | 5 | `YYYY-MM-DD-YYYY-MM-DD` | as written |
/// | 6 | anything else | default |
///
/// The default interval is `[1970-01-01, today]`, which overlaps any
/// sensible requested range, so an unparseable name never causes exclusion
/// on its own. Bounds are never reordered: `2022-2019` yields an interval
/// whose start lies after its end.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use folder_sweep::dates::DateRangeParser;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let parser = DateRangeParser::with_today(today);
///
/// let interval = parser.parse("Möten 2022");
/// assert_eq!(interval.start, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
/// assert_eq!(interval.end, NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DateRangeParser {
    today: NaiveDate,
}

impl Default for DateRangeParser {
    fn default() -> Self {
        Self::with_today(today())
    }
}

impl DateRangeParser {
    /// Creates a parser whose default interval ends at `today`
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The interval returned for names that carry no usable date
    pub fn default_interval(&self) -> DateInterval {
        DateInterval::full_range(self.today)
    }

    /// Parses a folder name; never fails
    pub fn parse(&self, folder_name: &str) -> DateInterval {
        self.parse_folder(folder_name).interval
    }

    /// Parses a folder name and reports which rule matched
    pub fn parse_folder(&self, folder_name: &str) -> FolderDate {
        let name = folder_name.trim();

        let lowered = name.to_lowercase();
        if QUALIFIER_TOKENS.iter().any(|token| lowered.contains(token)) {
            return self.undated(DateRule::Qualified);
        }

        let rules: [(DateRule, fn(&str) -> Option<DateInterval>); 4] = [
            (DateRule::ExactDate, parse_exact_date),
            (DateRule::YearRange, parse_year_range),
            (DateRule::SingleYear, parse_single_year),
            (DateRule::DateRange, parse_date_range),
        ];

        rules
            .iter()
            .find_map(|(rule, parse)| {
                parse(name).map(|interval| FolderDate {
                    interval,
                    rule: *rule,
                })
            })
            .unwrap_or_else(|| self.undated(DateRule::Undated))
    }

    fn undated(&self, rule: DateRule) -> FolderDate {
        FolderDate {
            interval: self.default_interval(),
            rule,
        }
    }
}

fn parse_exact_date(name: &str) -> Option<DateInterval> {
    let caps = EXACT_DATE.captures(name)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(DateInterval::single_day)
}

fn parse_year_range(name: &str) -> Option<DateInterval> {
    let caps = YEAR_RANGE.captures(name)?;
    let first: i32 = caps[1].parse().ok()?;
    let second: i32 = caps[2].parse().ok()?;
    Some(DateInterval::new(year_start(first)?, year_end(second)?))
}

fn parse_single_year(name: &str) -> Option<DateInterval> {
    let caps = SINGLE_YEAR.captures(name)?;
    let year: i32 = caps[1].parse().ok()?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    Some(DateInterval::new(year_start(year)?, year_end(year)?))
}

fn parse_date_range(name: &str) -> Option<DateInterval> {
    let caps = DATE_RANGE.captures(name)?;
    let start = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(&caps[2], "%Y-%m-%d").ok()?;
    Some(DateInterval::new(start, end))
}

fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}
