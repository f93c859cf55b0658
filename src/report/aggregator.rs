use crate::crawler::{BreadcrumbEntry, FetchError, FetchedPage, PageLink};
use crate::dates::DateInterval;
use crate::report::{
    CrawlReport, ErrorRecord, ExclusionReason, ExclusionRecord, FileEntry, FolderRef,
    FolderSummary, DEFAULT_FOLDER_LABEL, REPORT_VERSION, ROOT_LOCATION, UNKNOWN_FOLDER_LABEL,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Accumulation buffers for one crawl invocation
///
/// Records are append-only, except that a folder listed beyond the depth
/// bound can be [retracted](Self::retract_subfolder) when it turns up again
/// closer to the root. [`finish`](Self::finish) consumes the aggregator and
/// derives the folder summary.
#[derive(Debug)]
pub struct ResultAggregator {
    root_url: String,
    max_depth: u32,
    requested_range: DateInterval,
    root_folder_label: Option<String>,
    breadcrumb: Vec<BreadcrumbEntry>,
    files: Vec<FileEntry>,
    /// Paths of non-root folders holding at least one file
    folders_with_files: HashSet<String>,
    subfolders: Vec<FolderRef>,
    errors: Vec<ErrorRecord>,
    exclusions: Vec<ExclusionRecord>,
    fetch_delay: Duration,
    root_failed: bool,
    started: Instant,
}

impl ResultAggregator {
    pub fn new(root_url: &str, max_depth: u32, requested_range: DateInterval) -> Self {
        Self {
            root_url: root_url.to_string(),
            max_depth,
            requested_range,
            root_folder_label: None,
            breadcrumb: Vec::new(),
            files: Vec::new(),
            folders_with_files: HashSet::new(),
            subfolders: Vec::new(),
            errors: Vec::new(),
            exclusions: Vec::new(),
            fetch_delay: Duration::ZERO,
            root_failed: false,
            started: Instant::now(),
        }
    }

    /// Records the root page's display metadata
    pub fn set_root_page(&mut self, page: &FetchedPage) {
        let label = page
            .folder_label()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_FOLDER_LABEL.to_string());
        self.root_folder_label = Some(label);
        self.breadcrumb = page.breadcrumb.clone();
    }

    /// Appends a document found in `folder`
    pub fn add_file(&mut self, folder: &FolderRef, link: &PageLink) {
        let entry = if folder.is_root() {
            FileEntry {
                display_name: link.label.clone(),
                url: link.url.clone(),
                folder_location: ROOT_LOCATION.to_string(),
            }
        } else {
            self.folders_with_files.insert(folder.path.clone());
            FileEntry {
                display_name: format!("{}/{}", folder.path, link.label),
                url: link.url.clone(),
                folder_location: folder.path.clone(),
            }
        };
        self.files.push(entry);
    }

    /// Appends an accepted folder
    pub fn add_subfolder(&mut self, folder: FolderRef) {
        self.subfolders.push(folder);
    }

    /// Drops the accepted folder recorded at `path`
    pub fn retract_subfolder(&mut self, path: &str) {
        self.subfolders.retain(|folder| folder.path != path);
    }

    pub fn add_exclusion(&mut self, path: String, url: String, reason: ExclusionReason) {
        self.exclusions.push(ExclusionRecord { path, url, reason });
    }

    /// Appends a failed fetch of `folder`
    pub fn add_error(&mut self, folder: &FolderRef, error: &FetchError) {
        let kind = error.kind();
        if folder.is_root() {
            self.root_failed = true;
        }
        self.errors.push(ErrorRecord {
            path: folder.display_path().to_string(),
            url: folder.url.clone(),
            kind,
            message: error.to_string(),
            suggested_action: kind.suggested_action().to_string(),
        });
    }

    /// Accounts for a deliberate pacing sleep
    pub fn add_fetch_delay(&mut self, delay: Duration) {
        self.fetch_delay += delay;
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Freezes the buffers into a report
    pub fn finish(self) -> CrawlReport {
        let folder_summary = classify_folders(
            &self.folders_with_files,
            &self.subfolders,
            &self.errors,
            self.max_depth,
        );

        let root_folder_label = self
            .root_folder_label
            .unwrap_or_else(|| UNKNOWN_FOLDER_LABEL.to_string());

        CrawlReport {
            version: REPORT_VERSION,
            root_url: self.root_url,
            max_depth: self.max_depth,
            requested_range: self.requested_range,
            root_folder_label,
            breadcrumb: self.breadcrumb,
            files: self.files,
            subfolders: self.subfolders,
            errors: self.errors,
            exclusions: self.exclusions,
            folder_summary,
            elapsed_fetch_delay: self.fetch_delay,
            elapsed_total: self.started.elapsed(),
            degraded: self.root_failed,
        }
    }
}

/// Groups accepted folders into empty / intermediate / not searched
fn classify_folders(
    with_files: &HashSet<String>,
    subfolders: &[FolderRef],
    errors: &[ErrorRecord],
    max_depth: u32,
) -> FolderSummary {
    let failed: HashSet<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    let with_children: HashSet<&str> = subfolders.iter().filter_map(|s| s.parent_path()).collect();

    let mut summary = FolderSummary::default();

    for folder in subfolders {
        let path = folder.path.as_str();
        if folder.depth > max_depth {
            summary.not_searched.push(folder.path.clone());
        } else if with_files.contains(path) || failed.contains(path) {
            continue;
        } else if with_children.contains(path) {
            summary.intermediate.push(folder.path.clone());
        } else {
            summary.empty.push(folder.path.clone());
        }
    }

    summary
}
