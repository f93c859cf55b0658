//! Crawler module for folder traversal
//!
//! This module contains the core crawling logic, including:
//! - Fetching folder pages over HTTP
//! - Extracting breadcrumbs, documents and sub-folder links
//! - Denylist and date-range exclusion of folders
//! - Overall crawl orchestration and progress reporting

mod engine;
mod exclusion;
mod fetcher;
mod parser;
mod progress;

pub use engine::{CrawlEngine, CrawlRequest};
pub use exclusion::{Decision, ExclusionEvaluator};
pub use fetcher::{
    build_http_client, BreadcrumbEntry, FetchError, FetchedPage, HttpPageFetcher, PageFetcher,
    PageLink,
};
pub use parser::{is_navigation_label, parse_page, PagePatterns};
pub use progress::{ProgressSink, TracingProgress};

use crate::config::Config;
use crate::report::CrawlReport;
use crate::SweepError;

/// Runs a complete crawl described by a configuration file
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the crawl request from the `[crawl]` section
/// 2. Build the HTTP fetcher from the `[fetcher]` section
/// 3. Walk the folder tree and collect the report
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `progress` - Receiver of progress events
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (possibly with recorded failures)
/// * `Err(SweepError)` - The request was invalid or the client could not be built
pub async fn crawl(
    config: &Config,
    progress: &mut dyn ProgressSink,
) -> Result<CrawlReport, SweepError> {
    let request = config.crawl.to_request();
    let engine = CrawlEngine::new(HttpPageFetcher::new(&config.fetcher)?);
    engine.crawl(&request, progress).await
}
