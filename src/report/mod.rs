//! Crawl report types
//!
//! A crawl produces exactly one [`CrawlReport`]. The engine fills a
//! [`ResultAggregator`] while it walks the folder tree and turns it into the
//! immutable report once traversal is over.

mod aggregator;
pub mod selection;

pub use aggregator::ResultAggregator;
pub use selection::Selection;

use crate::crawler::BreadcrumbEntry;
use crate::dates::DateInterval;
use std::fmt;
use std::time::Duration;

/// Version of the [`CrawlReport`] layout
pub const REPORT_VERSION: u32 = 1;

/// `folder_location` of files found on the root page
pub const ROOT_LOCATION: &str = "current";

/// `path` of error records for the root page
pub const ROOT_ERROR_PATH: &str = "main folder";

/// Returns true for the labels reserved for the root in file and error
/// records; no sub-folder path may take one of them
pub fn is_reserved_path(path: &str) -> bool {
    path == ROOT_LOCATION || path == ROOT_ERROR_PATH
}

/// Root label used when the root page has no breadcrumb
pub const DEFAULT_FOLDER_LABEL: &str = "Current folder";

/// Root label used when the root page could not be fetched
pub const UNKNOWN_FOLDER_LABEL: &str = "Unknown folder";

/// A folder node in the traversal tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    /// Folder names from the root joined by `/`; empty for the root
    pub path: String,

    /// Address of the folder page
    pub url: String,

    /// Distance from the root; the root is 0
    pub depth: u32,

    /// Interval parsed from the folder's name or inherited from an ancestor
    pub date_interval: Option<DateInterval>,
}

impl FolderRef {
    /// Creates the root node
    pub fn root(url: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            url: url.into(),
            depth: 0,
            date_interval: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Path of a child folder called `name`
    ///
    /// A `/` inside a folder name is replaced by `-` so that path segments
    /// stay unambiguous.
    pub fn child_path(&self, name: &str) -> String {
        let segment = name.trim().replace('/', "-");
        if self.path.is_empty() {
            segment
        } else {
            format!("{}/{}", self.path, segment)
        }
    }

    /// Path of the parent folder; `None` for the root
    pub fn parent_path(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        Some(self.path.rsplit_once('/').map_or("", |(parent, _)| parent))
    }

    /// Label used in progress messages and error records
    pub fn display_path(&self) -> &str {
        if self.is_root() {
            ROOT_ERROR_PATH
        } else {
            &self.path
        }
    }
}

/// One discovered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Link label, prefixed with the folder path outside the root
    pub display_name: String,

    pub url: String,

    /// Owning folder's path, or [`ROOT_LOCATION`] for the root
    pub folder_location: String,
}

/// Why a discovered folder was not traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    /// The folder name contains a denylisted term
    Keyword,
    /// The folder's date interval misses the requested range
    DateRange,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "excluded-by-keyword",
            Self::DateRange => "excluded-by-date-range",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder that was discovered but not traversed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRecord {
    pub path: String,
    pub url: String,
    pub reason: ExclusionReason,
}

/// Coarse classification of a fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The page was transiently unavailable or changed while being read
    StaleReference,
    /// Anything else
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaleReference => "stale-reference",
            Self::Other => "other",
        }
    }

    /// Human hint for retrying the failed folder
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::StaleReference => {
                "The page was busy or changed while loading; re-run the scan for this folder."
            }
            Self::Other => {
                "Open the folder URL in a browser to check it, then re-run the scan for this folder."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder whose page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Folder path, or [`ROOT_ERROR_PATH`] for the root
    pub path: String,
    pub url: String,
    pub kind: ErrorKind,
    /// The underlying failure, for display
    pub message: String,
    pub suggested_action: String,
}

/// Accepted folders grouped for presentation
///
/// Derived once from the final report buffers. Folders whose fetch failed
/// appear in the report's errors instead of here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Fetched folders with neither files nor accepted sub-folders
    pub empty: Vec<String>,

    /// Fetched folders with accepted sub-folders but no direct files
    pub intermediate: Vec<String>,

    /// Folders beyond the depth bound: discovered, never fetched
    pub not_searched: Vec<String>,
}

/// Result of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub(crate) version: u32,
    pub(crate) root_url: String,
    pub(crate) max_depth: u32,
    pub(crate) requested_range: DateInterval,
    pub(crate) root_folder_label: String,
    pub(crate) breadcrumb: Vec<BreadcrumbEntry>,
    pub(crate) files: Vec<FileEntry>,
    pub(crate) subfolders: Vec<FolderRef>,
    pub(crate) errors: Vec<ErrorRecord>,
    pub(crate) exclusions: Vec<ExclusionRecord>,
    pub(crate) folder_summary: FolderSummary,
    pub(crate) elapsed_fetch_delay: Duration,
    pub(crate) elapsed_total: Duration,
    pub(crate) degraded: bool,
}

impl CrawlReport {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn requested_range(&self) -> DateInterval {
        self.requested_range
    }

    pub fn root_folder_label(&self) -> &str {
        &self.root_folder_label
    }

    pub fn breadcrumb(&self) -> &[BreadcrumbEntry] {
        &self.breadcrumb
    }

    /// Documents in discovery order
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Accepted folders in discovery order, whether or not their fetch succeeded
    pub fn subfolders(&self) -> &[FolderRef] {
        &self.subfolders
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn exclusions(&self) -> &[ExclusionRecord] {
        &self.exclusions
    }

    pub fn folder_summary(&self) -> &FolderSummary {
        &self.folder_summary
    }

    /// Time spent in deliberate pacing after fetches
    pub fn elapsed_fetch_delay(&self) -> Duration {
        self.elapsed_fetch_delay
    }

    /// Wall-clock duration of the crawl
    pub fn elapsed_total(&self) -> Duration {
        self.elapsed_total
    }

    /// Files whose owning folder is `location` ([`ROOT_LOCATION`] for the root)
    pub fn files_in<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a FileEntry> + 'a {
        self.files
            .iter()
            .filter(move |file| file.folder_location == location)
    }

    /// Number of accepted folders
    pub fn folder_count(&self) -> usize {
        self.subfolders.len()
    }

    /// Returns true if the root page itself could not be fetched
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}
