use crate::crawler::CrawlRequest;
use crate::dates::{self, DateInterval};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for folder-sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to crawl and which folders to skip
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Folder page the crawl starts from
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Deepest folder level fetched (0 = root page only)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Case-insensitive substrings that exclude a folder
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Earliest date of interest (defaults to 1970-01-01)
    #[serde(default)]
    pub earliest: Option<NaiveDate>,

    /// Latest date of interest (defaults to today)
    #[serde(default)]
    pub latest: Option<NaiveDate>,

    /// Wait after every page fetch (milliseconds)
    #[serde(rename = "pacing-delay")]
    pub pacing_delay: u64,
}

impl CrawlConfig {
    /// Requested date range with open ends filled in
    pub fn requested_range(&self) -> DateInterval {
        DateInterval::new(
            self.earliest.unwrap_or_else(dates::epoch),
            self.latest.unwrap_or_else(dates::today),
        )
    }

    /// Builds the engine request for this section
    pub fn to_request(&self) -> CrawlRequest {
        CrawlRequest {
            root_url: self.root_url.trim().to_string(),
            max_depth: self.max_depth,
            denylist: self.exclude.clone(),
            requested_range: self.requested_range(),
            pacing_delay: Duration::from_millis(self.pacing_delay),
        }
    }
}

/// HTTP client and page layout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Request timeout (seconds)
    pub timeout: u64,

    /// Path fragment identifying document links
    #[serde(rename = "document-path")]
    pub document_path: String,

    /// Query fragment identifying document links
    #[serde(rename = "document-param")]
    pub document_param: String,

    /// Path fragment identifying folder links
    #[serde(rename = "folder-path")]
    pub folder_path: String,

    /// CSS selector of the breadcrumb container
    #[serde(rename = "breadcrumb-selector")]
    pub breadcrumb_selector: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("folder-sweep/{}", env!("CARGO_PKG_VERSION")),
            timeout: 30,
            document_path: "/document/".to_string(),
            document_param: "hash=".to_string(),
            folder_path: "/channel/".to_string(),
            breadcrumb_selector: ".np-breadcrumb".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown report file
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,

    /// Path to the SQLite export file
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,
}
