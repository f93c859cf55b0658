//! Crawl engine - folder traversal orchestration
//!
//! This module contains the depth-first walk over the folder tree that
//! coordinates every part of a crawl:
//! - Validating the request
//! - Fetching one folder page at a time, with pacing after each fetch
//! - Judging discovered sub-folders (denylist, date range, inheritance)
//! - Recording files, accepted folders, exclusions and failures
//! - Reporting progress

use crate::crawler::exclusion::{Decision, ExclusionEvaluator};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::is_navigation_label;
use crate::crawler::progress::ProgressSink;
use crate::dates::{DateInterval, DateRangeParser};
use crate::report::{is_reserved_path, CrawlReport, FolderRef, ResultAggregator};
use crate::url::{normalize_url, url_key};
use crate::SweepError;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Parameters of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Folder page the walk starts from
    pub root_url: String,

    /// Deepest folder level fetched; 0 scans only the root page
    pub max_depth: u32,

    /// Case-insensitive substrings that exclude a folder by name
    pub denylist: Vec<String>,

    /// Inclusive range of dates the operator is interested in
    pub requested_range: DateInterval,

    /// Wait after every page fetch
    pub pacing_delay: Duration,
}

impl CrawlRequest {
    /// Checks the request before any fetch is attempted
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The request can be crawled
    /// * `Err(SweepError::InvalidRequest)` - Empty or unusable root URL,
    ///   earliest date after latest date, or zero pacing delay
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.root_url.trim().is_empty() {
            return Err(SweepError::InvalidRequest(
                "root URL cannot be empty".to_string(),
            ));
        }

        normalize_url(&self.root_url).map_err(|e| {
            SweepError::InvalidRequest(format!("root URL '{}': {}", self.root_url, e))
        })?;

        if !self.requested_range.is_ordered() {
            return Err(SweepError::InvalidRequest(format!(
                "earliest date {} is after latest date {}",
                self.requested_range.start, self.requested_range.end
            )));
        }

        if self.pacing_delay.is_zero() {
            return Err(SweepError::InvalidRequest(
                "pacing delay must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Per-invocation traversal state
struct CrawlState<'r> {
    request: &'r CrawlRequest,
    evaluator: ExclusionEvaluator,
    progress: &'r mut dyn ProgressSink,
    /// Identity keys of fetched (or attempted) folder pages
    visited: HashSet<String>,
    /// Identity keys of accepted folders, mapped to the path they were listed at
    accepted: HashMap<String, String>,
    /// Identity keys of folders already recorded as excluded
    excluded: HashSet<String>,
    /// Paths handed out to accepted folders
    paths: HashSet<String>,
    aggregator: ResultAggregator,
}

impl CrawlState<'_> {
    fn progress_total(&self) -> u64 {
        u64::from(self.request.max_depth.max(1))
    }

    /// Path for a child of `parent` called `name`, distinct from the root's
    /// labels and from every path handed out so far
    fn claim_path(&mut self, parent: &FolderRef, name: &str) -> String {
        let base = parent.child_path(name);
        let mut path = base.clone();
        let mut n = 1;
        while is_reserved_path(&path) || self.paths.contains(&path) {
            n += 1;
            path = format!("{} ({})", base, n);
        }
        self.paths.insert(path.clone());
        path
    }

    /// Drops an accepted folder that was listed beyond the depth bound
    fn retract(&mut self, path: &str) {
        self.aggregator.retract_subfolder(path);
        self.paths.remove(path);
    }
}

/// Depth-first folder crawler over a [`PageFetcher`]
///
/// Only one page fetch is ever in flight. Each fetch is followed by the
/// request's pacing delay, which lets client-side content settle and keeps
/// the load on the archive server low.
///
/// # Example
///
/// ```no_run
/// use folder_sweep::config::FetcherConfig;
/// use folder_sweep::crawler::{CrawlEngine, CrawlRequest, HttpPageFetcher, TracingProgress};
/// use folder_sweep::dates::DateInterval;
/// use chrono::NaiveDate;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = CrawlEngine::new(HttpPageFetcher::new(&FetcherConfig::default())?);
/// let request = CrawlRequest {
///     root_url: "https://www.netpublicator.com/reader/r90521909".to_string(),
///     max_depth: 2,
///     denylist: vec!["arkiv".to_string()],
///     requested_range: DateInterval::new(
///         NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
///     ),
///     pacing_delay: Duration::from_secs(5),
/// };
/// let report = engine.crawl(&request, &mut TracingProgress).await?;
/// println!("{} files", report.files().len());
/// # Ok(())
/// # }
/// ```
pub struct CrawlEngine<F> {
    fetcher: F,
    parser: DateRangeParser,
}

impl<F: PageFetcher> CrawlEngine<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            parser: DateRangeParser::default(),
        }
    }

    /// Replaces the folder-name date parser (e.g. to pin "today")
    pub fn with_date_parser(mut self, parser: DateRangeParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs one crawl
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The walk finished. If the root page itself could
    ///   not be fetched the report is degraded: no files or folders, a
    ///   placeholder label and a single error record.
    /// * `Err(SweepError::InvalidRequest)` - The request failed validation;
    ///   nothing was fetched
    pub async fn crawl(
        &self,
        request: &CrawlRequest,
        progress: &mut dyn ProgressSink,
    ) -> Result<CrawlReport, SweepError> {
        request.validate()?;

        tracing::info!(
            "Starting crawl of {} (max depth {}, range {}, {} denylist terms)",
            request.root_url,
            request.max_depth,
            request.requested_range,
            request.denylist.len()
        );

        let mut state = CrawlState {
            request,
            evaluator: ExclusionEvaluator::new(&request.denylist, request.requested_range),
            progress,
            visited: HashSet::new(),
            accepted: HashMap::new(),
            excluded: HashSet::new(),
            paths: HashSet::new(),
            aggregator: ResultAggregator::new(
                &request.root_url,
                request.max_depth,
                request.requested_range,
            ),
        };

        self.visit(&mut state, FolderRef::root(request.root_url.trim()), None)
            .await;

        let total = state.progress_total();
        state.progress.report(total, total, "Scan complete");

        let report = state.aggregator.finish();

        if report.is_degraded() {
            tracing::error!("Root folder {} could not be fetched", request.root_url);
        }
        tracing::info!(
            "Crawl completed: {} files, {} folders, {} excluded, {} errors in {:?} ({:?} pacing)",
            report.files().len(),
            report.subfolders().len(),
            report.exclusions().len(),
            report.errors().len(),
            report.elapsed_total(),
            report.elapsed_fetch_delay()
        );

        Ok(report)
    }

    /// Visits one folder and, depth permitting, its accepted sub-folders
    ///
    /// `inherited` is the exact-day interval handed down by `node` to its
    /// children. Failures are recorded, never returned: a broken folder only
    /// costs its own subtree.
    fn visit<'a>(
        &'a self,
        state: &'a mut CrawlState<'_>,
        node: FolderRef,
        inherited: Option<DateInterval>,
    ) -> Pin<Box<dyn Future<Output = ()> + 'a>> {
        Box::pin(async move {
            let max_depth = state.request.max_depth;
            let key = url_key(&node.url);

            if node.depth > max_depth || !state.visited.insert(key.clone()) {
                tracing::trace!("Skipping {} (depth {})", node.url, node.depth);
                return;
            }

            let total = state.progress_total();
            let done = u64::from(node.depth).min(total);
            state
                .progress
                .report(done, total, &format!("Scanning {}", node.display_path()));

            tracing::debug!("Fetching {} at depth {}: {}", node.display_path(), node.depth, node.url);

            let fetched = self.fetcher.fetch(&node.url).await;

            let pacing = state.request.pacing_delay;
            tokio::time::sleep(pacing).await;
            state.aggregator.add_fetch_delay(pacing);

            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch {} ({}): {}",
                        node.display_path(),
                        e.kind(),
                        e
                    );
                    state.aggregator.add_error(&node, &e);
                    return;
                }
            };

            if node.is_root() {
                state.aggregator.set_root_page(&page);
            }

            for document in &page.documents {
                state.aggregator.add_file(&node, document);
            }

            let ancestors: HashSet<String> = page
                .breadcrumb
                .iter()
                .filter_map(|entry| entry.url.as_deref())
                .map(url_key)
                .collect();

            let fetches_children = node.depth < max_depth;

            for link in page.subfolders {
                let link_key = url_key(&link.url);

                if link_key == key
                    || ancestors.contains(&link_key)
                    || is_navigation_label(&link.label)
                    || state.visited.contains(&link_key)
                {
                    tracing::trace!("Ignoring navigation link '{}' -> {}", link.label, link.url);
                    continue;
                }

                // An accepted but unvisited folder was listed beyond the depth
                // bound; it is only worth another look if this sighting is fetched
                let listed_at = state.accepted.get(&link_key).cloned();
                if listed_at.is_some() && !fetches_children {
                    tracing::trace!("Already listed '{}' -> {}", link.label, link.url);
                    continue;
                }

                let candidate = self.parser.parse_folder(&link.label);

                match state.evaluator.evaluate(&link.label, candidate, inherited) {
                    Decision::Exclude { reason } => {
                        if listed_at.is_some() || !state.excluded.insert(link_key) {
                            tracing::trace!("Already recorded '{}' -> {}", link.label, link.url);
                            continue;
                        }
                        let path = node.child_path(&link.label);
                        tracing::debug!("Excluding {} ({})", path, reason);
                        state.aggregator.add_exclusion(path, link.url, reason);
                    }
                    Decision::Include { effective, inherit } => {
                        if let Some(previous) = listed_at {
                            tracing::debug!("Moving {} up to depth {}", previous, node.depth + 1);
                            state.retract(&previous);
                        }

                        let child = FolderRef {
                            path: state.claim_path(&node, &link.label),
                            url: link.url,
                            depth: node.depth + 1,
                            date_interval: Some(effective),
                        };

                        state.accepted.insert(link_key, child.path.clone());
                        state.aggregator.add_subfolder(child.clone());

                        if fetches_children {
                            self.visit(state, child, inherit).await;
                        }
                    }
                }
            }

            tracing::debug!(
                "Finished {} ({} files so far)",
                node.display_path(),
                state.aggregator.file_count()
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::{FetchError, FetchedPage, PageLink};
    use crate::report::ExclusionReason;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory folder tree; unknown URLs fail with HTTP 404
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, FetchedPage>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn page(mut self, url: &str, documents: &[(&str, &str)], folders: &[(&str, &str)]) -> Self {
            let page = FetchedPage {
                breadcrumb: Vec::new(),
                documents: documents.iter().map(|(l, u)| PageLink::new(*l, *u)).collect(),
                subfolders: folders.iter().map(|(l, u)| PageLink::new(*l, *u)).collect(),
            };
            self.pages.insert(url.to_string(), page);
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(max_depth: u32) -> CrawlRequest {
        CrawlRequest {
            root_url: "https://example.com/c/root".to_string(),
            max_depth,
            denylist: vec![],
            requested_range: DateInterval::new(date(2022, 1, 1), date(2022, 12, 31)),
            pacing_delay: Duration::from_millis(1),
        }
    }

    fn engine(fetcher: FakeFetcher) -> CrawlEngine<FakeFetcher> {
        CrawlEngine::new(fetcher).with_date_parser(DateRangeParser::with_today(date(2024, 6, 1)))
    }

    #[test]
    fn test_validate_rejects_bad_requests() {
        let mut req = request(1);
        req.root_url = "  ".to_string();
        assert!(matches!(req.validate(), Err(SweepError::InvalidRequest(_))));

        let mut req = request(1);
        req.root_url = "not a url".to_string();
        assert!(req.validate().is_err());

        let mut req = request(1);
        req.requested_range = DateInterval::new(date(2023, 1, 1), date(2022, 1, 1));
        assert!(req.validate().is_err());

        let mut req = request(1);
        req.pacing_delay = Duration::ZERO;
        assert!(req.validate().is_err());

        assert!(request(1).validate().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_request_fetches_nothing() {
        let engine = engine(FakeFetcher::default());
        let mut req = request(1);
        req.root_url = String::new();

        let result = engine.crawl(&req, &mut |_: u64, _: u64, _: &str| {}).await;
        assert!(result.is_err());
        assert!(engine.fetcher().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keyword_and_date_exclusions() {
        let fetcher = FakeFetcher::default()
            .page(
                "https://example.com/c/root",
                &[("Kallelse.pdf", "https://example.com/document/1?hash=a")],
                &[
                    ("2022 Möten", "https://example.com/c/a"),
                    ("2021", "https://example.com/c/b"),
                    ("Arkiv 2022", "https://example.com/c/c"),
                ],
            )
            .page(
                "https://example.com/c/a",
                &[("Protokoll.pdf", "https://example.com/document/2?hash=b")],
                &[],
            );
        let engine = engine(fetcher);
        let mut req = request(1);
        req.denylist = vec!["arkiv".to_string()];

        let report = engine
            .crawl(&req, &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        let paths: Vec<&str> = report.subfolders().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["2022 Möten"]);

        let exclusions: Vec<(&str, ExclusionReason)> = report
            .exclusions()
            .iter()
            .map(|e| (e.path.as_str(), e.reason))
            .collect();
        assert_eq!(
            exclusions,
            vec![
                ("2021", ExclusionReason::DateRange),
                ("Arkiv 2022", ExclusionReason::Keyword)
            ]
        );
        assert_eq!(report.files()[1].display_name, "2022 Möten/Protokoll.pdf");
        assert!(report.errors().is_empty());
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_only_root() {
        let fetcher = FakeFetcher::default().page(
            "https://example.com/c/root",
            &[],
            &[("2022", "https://example.com/c/a"), ("Mars", "https://example.com/c/b")],
        );
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(0), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert_eq!(report.folder_count(), 2);
        assert_eq!(report.folder_summary().not_searched, vec!["2022", "Mars"]);
        assert_eq!(
            *engine.fetcher().calls.lock().unwrap(),
            vec!["https://example.com/c/root".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_folder_keeps_siblings() {
        let fetcher = FakeFetcher::default()
            .page(
                "https://example.com/c/root",
                &[],
                &[
                    ("Trasig", "https://example.com/c/missing"),
                    ("2022", "https://example.com/c/a"),
                ],
            )
            .page(
                "https://example.com/c/a",
                &[("Protokoll.pdf", "https://example.com/document/2?hash=b")],
                &[],
            );
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(2), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].path, "Trasig");
        assert_eq!(report.files().len(), 1);
        assert_eq!(report.folder_count(), 2);
        assert!(!report.is_degraded());
    }

    #[tokio::test]
    async fn test_unreachable_root_degrades() {
        let engine = engine(FakeFetcher::default());

        let report = engine
            .crawl(&request(2), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert!(report.is_degraded());
        assert_eq!(report.root_folder_label(), "Unknown folder");
        assert!(report.files().is_empty());
        assert!(report.subfolders().is_empty());
    }

    #[tokio::test]
    async fn test_progress_fraction_follows_depth() {
        let fetcher = FakeFetcher::default()
            .page("https://example.com/c/root", &[], &[("2022", "https://example.com/c/a")])
            .page("https://example.com/c/a", &[], &[("Mars", "https://example.com/c/b")])
            .page("https://example.com/c/b", &[], &[]);
        let engine = engine(fetcher);

        let mut events = Vec::new();
        let mut sink = |done: u64, total: u64, _: &str| events.push((done, total));
        engine.crawl(&request(2), &mut sink).await.unwrap();

        assert_eq!(events, vec![(0, 2), (1, 2), (2, 2), (2, 2)]);
    }

    #[tokio::test]
    async fn test_pacing_is_accounted_per_fetch() {
        let fetcher = FakeFetcher::default()
            .page("https://example.com/c/root", &[], &[("2022", "https://example.com/c/a")])
            .page("https://example.com/c/a", &[], &[]);
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(1), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();
        assert_eq!(report.elapsed_fetch_delay(), Duration::from_millis(2));
    }

    #[tokio::test]
    async fn test_self_and_visited_links_are_not_children() {
        let fetcher = FakeFetcher::default()
            .page(
                "https://example.com/c/root",
                &[],
                &[
                    ("Protokoll", "https://example.com/c/root/"),
                    ("2022", "https://example.com/c/a"),
                ],
            )
            .page("https://example.com/c/a", &[], &[("Start", "https://example.com/c/root")]);
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(3), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        let paths: Vec<&str> = report.subfolders().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["2022"]);
        assert_eq!(engine.fetcher().calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_accepted_folder_records_effective_interval() {
        let fetcher = FakeFetcher::default()
            .page("https://example.com/c/root", &[], &[("2022-05-10", "https://example.com/c/a")])
            .page("https://example.com/c/a", &[], &[("Bilagor", "https://example.com/c/b")])
            .page("https://example.com/c/b", &[], &[]);
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(2), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        let day = DateInterval::single_day(date(2022, 5, 10));
        assert_eq!(report.subfolders()[0].date_interval, Some(day));
        assert_eq!(report.subfolders()[1].path, "2022-05-10/Bilagor");
        assert_eq!(report.subfolders()[1].date_interval, Some(day));
    }

    fn paths(report: &CrawlReport) -> Vec<&str> {
        report.subfolders().iter().map(|f| f.path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_folder_first_seen_beyond_bound_is_fetched_when_closer() {
        let fetcher = FakeFetcher::default()
            .page(
                "https://example.com/c/root",
                &[],
                &[("Alfa", "https://example.com/c/a"), ("Xray", "https://example.com/c/x")],
            )
            .page("https://example.com/c/a", &[], &[("Xray", "https://example.com/c/x")])
            .page(
                "https://example.com/c/x",
                &[("Doc.pdf", "https://example.com/document/1?hash=a")],
                &[],
            );
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(1), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert_eq!(
            *engine.fetcher().calls.lock().unwrap(),
            vec![
                "https://example.com/c/root".to_string(),
                "https://example.com/c/a".to_string(),
                "https://example.com/c/x".to_string(),
            ]
        );
        assert_eq!(report.files().len(), 1);
        assert_eq!(report.files()[0].display_name, "Xray/Doc.pdf");
        assert_eq!(paths(&report), vec!["Alfa", "Xray"]);
        assert!(report.folder_summary().not_searched.is_empty());
    }

    #[tokio::test]
    async fn test_back_links_with_ordinary_labels_are_fetched_once() {
        let fetcher = FakeFetcher::default()
            .page("https://example.com/c/root", &[], &[("Alfa", "https://example.com/c/a")])
            .page(
                "https://example.com/c/a",
                &[],
                &[
                    ("Protokoll", "https://example.com/c/root"),
                    ("Alfa", "https://example.com/c/a"),
                    ("Beta", "https://example.com/c/b"),
                ],
            )
            .page("https://example.com/c/b", &[], &[("Alfa", "https://example.com/c/a/")]);
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(5), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert_eq!(
            *engine.fetcher().calls.lock().unwrap(),
            vec![
                "https://example.com/c/root".to_string(),
                "https://example.com/c/a".to_string(),
                "https://example.com/c/b".to_string(),
            ]
        );
        assert_eq!(paths(&report), vec!["Alfa", "Alfa/Beta"]);
    }

    #[tokio::test]
    async fn test_colliding_names_get_distinct_paths() {
        let fetcher = FakeFetcher::default().page(
            "https://example.com/c/root",
            &[],
            &[
                ("Bilagor", "https://example.com/c/a"),
                ("Bilagor", "https://example.com/c/b"),
                ("Jan/Feb", "https://example.com/c/c"),
                ("Jan-Feb", "https://example.com/c/d"),
                ("current", "https://example.com/c/e"),
            ],
        );
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(0), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert_eq!(
            paths(&report),
            vec!["Bilagor", "Bilagor (2)", "Jan-Feb", "Jan-Feb (2)", "current (2)"]
        );
    }

    #[tokio::test]
    async fn test_excluded_folder_is_recorded_once() {
        let fetcher = FakeFetcher::default()
            .page(
                "https://example.com/c/root",
                &[],
                &[("2022", "https://example.com/c/a"), ("Arkiv", "https://example.com/c/old")],
            )
            .page("https://example.com/c/a", &[], &[("Arkiv", "https://example.com/c/old")]);
        let engine = engine(fetcher);
        let mut req = request(2);
        req.denylist = vec!["arkiv".to_string()];

        let report = engine
            .crawl(&req, &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        assert_eq!(report.exclusions().len(), 1);
        assert_eq!(report.exclusions()[0].path, "2022/Arkiv");
    }

    #[tokio::test]
    async fn test_one_day_range_does_not_date_children() {
        let fetcher = FakeFetcher::default()
            .page(
                "https://example.com/c/root",
                &[],
                &[("2022-05-10-2022-05-10", "https://example.com/c/a")],
            )
            .page("https://example.com/c/a", &[], &[("2021", "https://example.com/c/b")])
            .page("https://example.com/c/b", &[], &[]);
        let engine = engine(fetcher);

        let report = engine
            .crawl(&request(2), &mut |_: u64, _: u64, _: &str| {})
            .await
            .unwrap();

        // 2021 is judged by its own name, not by the parent's day
        assert_eq!(paths(&report), vec!["2022-05-10-2022-05-10"]);
        assert_eq!(report.exclusions()[0].path, "2022-05-10-2022-05-10/2021");
    }
}
