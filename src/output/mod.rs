//! Output module for presenting crawl reports
//!
//! This module handles:
//! - Rendering a report as a markdown document
//! - Exporting a report into a SQLite database
//! - Printing report statistics to the console

mod markdown;
mod sqlite_output;
pub mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use sqlite_output::{export_to_sqlite, SqliteExporter, SCHEMA_SQL};
pub use stats::{print_errors, print_statistics, CrawlStatistics};
