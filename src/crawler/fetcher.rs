//! Page fetching
//!
//! This module defines the [`PageFetcher`] capability the crawl engine depends
//! on, the page shape it returns, the typed failures it reports, and an
//! HTTP implementation for server-rendered folder pages:
//! - Building HTTP clients with a proper user agent string
//! - GET requests with timeout handling
//! - Content-Type checks
//! - Error classification (transient vs. other)

use crate::config::FetcherConfig;
use crate::crawler::parser::{parse_page, PagePatterns};
use crate::report::ErrorKind;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A labelled link found on a folder page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    pub url: String,
}

impl PageLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// One step of a page's ancestry trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbEntry {
    pub label: String,
    pub url: Option<String>,
}

/// Everything the crawler needs from one folder page
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// Ancestry trail from the archive root to this folder
    pub breadcrumb: Vec<BreadcrumbEntry>,

    /// Document links, in page order
    pub documents: Vec<PageLink>,

    /// Sub-folder links, in page order
    pub subfolders: Vec<PageLink>,
}

impl FetchedPage {
    /// The folder's own label: the last breadcrumb entry, if any
    pub fn folder_label(&self) -> Option<&str> {
        self.breadcrumb.last().map(|entry| entry.label.as_str())
    }
}

/// Failure to fetch or read a folder page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The page changed underneath the reader (stale element, partial render)
    #[error("Page content went stale while reading {url}: {message}")]
    Stale { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Could not connect to {url}")]
    Connect { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read page {url}: {message}")]
    Parse { url: String, message: String },

    #[error("HTTP error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// Classifies the failure for the crawl report
    ///
    /// | Failure | Kind |
    /// |---------|------|
    /// | Stale content, timeout, connect error | StaleReference |
    /// | HTTP 429, HTTP 5xx | StaleReference |
    /// | Anything else | Other |
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Stale { .. } | Self::Timeout { .. } | Self::Connect { .. } => {
                ErrorKind::StaleReference
            }
            Self::Status { status, .. } if *status == 429 || *status >= 500 => {
                ErrorKind::StaleReference
            }
            _ => ErrorKind::Other,
        }
    }

    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Stale { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url }
            | Self::Status { url, .. }
            | Self::ContentMismatch { url, .. }
            | Self::Parse { url, .. }
            | Self::Network { url, .. }
            | Self::InvalidUrl { url, .. } => url,
        }
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect { url }
        } else {
            Self::Network {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Capability that turns a folder URL into its links
///
/// Implementations must let client-side content settle before reading the
/// page, and must exclude from `subfolders` any link to the page itself, to a
/// breadcrumb ancestor, or with a navigation label (see
/// [`is_navigation_label`](crate::crawler::is_navigation_label)).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use folder_sweep::config::FetcherConfig;
/// use folder_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] over plain HTTP for server-rendered folder pages
pub struct HttpPageFetcher {
    client: Client,
    patterns: PagePatterns,
}

impl HttpPageFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            patterns: PagePatterns::from(config),
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, patterns: PagePatterns) -> Self {
        Self { client, patterns }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    /// Fetches a folder page
    ///
    /// # Request Flow
    ///
    /// 1. Validate the URL
    /// 2. Send GET request (redirects followed by the client)
    /// 3. Map non-success statuses to [`FetchError::Status`]
    /// 4. Reject bodies that declare a non-HTML Content-Type
    /// 5. Parse the body relative to the final URL
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();

        // A missing header is tolerated; a declared non-HTML type is not
        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("text/html") {
                return Err(FetchError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        parse_page(&body, &final_url, &self.patterns).map_err(|message| FetchError::Parse {
            url: url.to_string(),
            message,
        })
    }
}
