//! Statistics derived from a crawl report
//!
//! This module provides the counts shown at the end of a crawl and prints
//! them to the console.

use crate::report::{CrawlReport, ErrorKind, ExclusionReason};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of files found
    pub total_files: usize,

    /// Files found on the root page itself
    pub root_files: usize,

    /// Accepted folders (fetched or not)
    pub total_folders: usize,

    /// Folders skipped because of a denylist term
    pub excluded_by_keyword: usize,

    /// Folders skipped because of their date
    pub excluded_by_date: usize,

    /// Failed folders worth retrying
    pub stale_errors: usize,

    /// Other failed folders
    pub other_errors: usize,

    /// Folders beyond the depth bound
    pub not_searched: usize,

    pub elapsed_total: Duration,

    pub elapsed_fetch_delay: Duration,
}

impl CrawlStatistics {
    /// Counts the records of `report`
    pub fn from_report(report: &CrawlReport) -> Self {
        let count_reason = |reason: ExclusionReason| {
            report
                .exclusions()
                .iter()
                .filter(|e| e.reason == reason)
                .count()
        };
        let count_kind =
            |kind: ErrorKind| report.errors().iter().filter(|e| e.kind == kind).count();

        Self {
            total_files: report.files().len(),
            root_files: report.files_in(crate::report::ROOT_LOCATION).count(),
            total_folders: report.folder_count(),
            excluded_by_keyword: count_reason(ExclusionReason::Keyword),
            excluded_by_date: count_reason(ExclusionReason::DateRange),
            stale_errors: count_kind(ErrorKind::StaleReference),
            other_errors: count_kind(ErrorKind::Other),
            not_searched: report.folder_summary().not_searched.len(),
            elapsed_total: report.elapsed_total(),
            elapsed_fetch_delay: report.elapsed_fetch_delay(),
        }
    }

    pub fn total_errors(&self) -> usize {
        self.stale_errors + self.other_errors
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!(
        "  Files found: {} ({} in the root folder)",
        stats.total_files, stats.root_files
    );
    println!("  Folders accepted: {}", stats.total_folders);
    if stats.not_searched > 0 {
        println!("  Folders beyond max depth: {}", stats.not_searched);
    }
    println!();

    let excluded = stats.excluded_by_keyword + stats.excluded_by_date;
    if excluded > 0 {
        println!("Excluded Folders:");
        println!("  By keyword: {}", stats.excluded_by_keyword);
        println!("  By date range: {}", stats.excluded_by_date);
        println!();
    }

    if stats.total_errors() > 0 {
        println!("Failed Folders:");
        println!("  Stale or transient: {}", stats.stale_errors);
        println!("  Other: {}", stats.other_errors);
        println!();
    }

    let total = stats.elapsed_total.as_secs_f64();
    let pacing = stats.elapsed_fetch_delay.as_secs_f64();
    let pacing_share = if total > 0.0 {
        (pacing / total * 100.0).min(100.0)
    } else {
        0.0
    };
    println!(
        "Elapsed: {:.1}s ({:.1}s pacing, {:.1}%)",
        total, pacing, pacing_share
    );
}

/// Prints every error record with its suggested action
pub fn print_errors(report: &CrawlReport) {
    for error in report.errors() {
        println!("  ✗ {} [{}]: {}", error.path, error.kind, error.message);
        println!("    {}", error.url);
        println!("    {}", error.suggested_action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{FetchError, PageLink};
    use crate::dates::DateInterval;
    use crate::report::{FolderRef, ResultAggregator};
    use chrono::NaiveDate;

    #[test]
    fn test_statistics_from_report() {
        let range = DateInterval::single_day(NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
        let mut aggregator = ResultAggregator::new("https://example.com/channel/1", 0, range);
        let root = FolderRef::root("https://example.com/channel/1");
        aggregator.add_file(&root, &PageLink::new("a.pdf", "https://example.com/document/1?hash=a"));
        aggregator.add_subfolder(FolderRef {
            path: "2022".to_string(),
            url: "https://example.com/channel/2".to_string(),
            depth: 1,
            date_interval: None,
        });
        aggregator.add_exclusion(
            "Arkiv".to_string(),
            "https://example.com/channel/3".to_string(),
            ExclusionReason::Keyword,
        );
        aggregator.add_error(
            &FolderRef {
                path: "Trasig".to_string(),
                url: "https://example.com/channel/4".to_string(),
                depth: 1,
                date_interval: None,
            },
            &FetchError::Status {
                url: "https://example.com/channel/4".to_string(),
                status: 404,
            },
        );

        let stats = CrawlStatistics::from_report(&aggregator.finish());
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.root_files, 1);
        assert_eq!(stats.total_folders, 1);
        assert_eq!(stats.excluded_by_keyword, 1);
        assert_eq!(stats.excluded_by_date, 0);
        assert_eq!(stats.other_errors, 1);
        assert_eq!(stats.not_searched, 1);
        assert_eq!(stats.total_errors(), 1);
    }
}
