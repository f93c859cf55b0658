//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small folder archive and run the
//! full fetch, parse, exclude and report cycle end-to-end.

use chrono::NaiveDate;
use folder_sweep::config::{load_config_with_hash, FetcherConfig};
use folder_sweep::crawler::{self, CrawlEngine, CrawlRequest, HttpPageFetcher, TracingProgress};
use folder_sweep::dates::DateInterval;
use folder_sweep::output::{export_to_sqlite, format_markdown_report, write_markdown_report};
use folder_sweep::report::{CrawlReport, ErrorKind, ExclusionReason};
use std::io::Write;
use std::time::Duration;
use tempfile::{tempdir, NamedTempFile};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOT_PATH: &str = "/reader/r1/channel/root";

fn root_page() -> String {
    r#"<html><body>
        <div class="np-breadcrumb">
            <div><a href="/reader/r1/channel/top">Kommun</a></div>
            <div>❯</div>
            <div><a href="/reader/r1/channel/root">Protokoll</a></div>
        </div>
        <a href="/reader/r1/document/1?hash=aa">Kallelse.pdf</a>
        <a href="/reader/r1/channel/a">2022 Möten</a>
        <a href="/reader/r1/channel/b">2021</a>
        <a href="/reader/r1/channel/c">Arkiv 2022</a>
    </body></html>"#
        .to_string()
}

fn meetings_page() -> String {
    r#"<html><body>
        <div class="np-breadcrumb">
            <div><a href="/reader/r1/channel/root">Protokoll</a></div>
            <div>❯</div>
            <div><a href="/reader/r1/channel/a">2022 Möten</a></div>
        </div>
        <a href="/reader/r1/channel/root">Upp</a>
        <a href="/reader/r1/document/2?hash=bb">Protokoll 2022-03.pdf</a>
        <a href="/reader/r1/channel/broken">Trasig</a>
        <a href="/reader/r1/channel/d">Bilagor</a>
    </body></html>"#
        .to_string()
}

fn attachments_page() -> String {
    r#"<html><body>
        <a href="/reader/r1/document/3?hash=cc">Bilaga 1.pdf</a>
    </body></html>"#
        .to_string()
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .expect(hits)
        .mount(server)
        .await;
}

fn year_2022() -> DateInterval {
    DateInterval::new(
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
    )
}

fn request(server: &MockServer, max_depth: u32) -> CrawlRequest {
    CrawlRequest {
        root_url: format!("{}{}", server.uri(), ROOT_PATH),
        max_depth,
        denylist: vec!["arkiv".to_string()],
        requested_range: year_2022(),
        pacing_delay: Duration::from_millis(1),
    }
}

async fn run(server: &MockServer, max_depth: u32) -> CrawlReport {
    let fetcher = HttpPageFetcher::new(&FetcherConfig::default()).unwrap();
    let engine = CrawlEngine::new(fetcher);
    engine
        .crawl(&request(server, max_depth), &mut TracingProgress)
        .await
        .unwrap()
}

fn folder_paths(report: &CrawlReport) -> Vec<&str> {
    report.subfolders().iter().map(|f| f.path.as_str()).collect()
}

fn file_names(report: &CrawlReport) -> Vec<&str> {
    report
        .files()
        .iter()
        .map(|f| f.display_name.as_str())
        .collect()
}

#[tokio::test]
async fn test_crawl_excludes_by_keyword_and_date() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, html(root_page()), 1).await;
    mount_page(&server, "/reader/r1/channel/a", html(meetings_page()), 1).await;
    mount_page(&server, "/reader/r1/channel/b", html(attachments_page()), 0).await;
    mount_page(&server, "/reader/r1/channel/c", html(attachments_page()), 0).await;
    mount_page(&server, "/reader/r1/channel/d", html(attachments_page()), 0).await;

    let report = run(&server, 1).await;

    assert_eq!(report.root_folder_label(), "Protokoll");
    assert_eq!(report.breadcrumb().len(), 2);
    assert_eq!(
        file_names(&report),
        vec!["Kallelse.pdf", "2022 Möten/Protokoll 2022-03.pdf"]
    );
    assert_eq!(report.files()[0].folder_location, "current");

    // Trasig and Bilagor are accepted at depth 2 but never fetched
    assert_eq!(
        folder_paths(&report),
        vec!["2022 Möten", "2022 Möten/Trasig", "2022 Möten/Bilagor"]
    );
    assert_eq!(
        report.folder_summary().not_searched,
        vec!["2022 Möten/Trasig", "2022 Möten/Bilagor"]
    );

    let exclusions: Vec<(&str, ExclusionReason)> = report
        .exclusions()
        .iter()
        .map(|e| (e.path.as_str(), e.reason))
        .collect();
    assert_eq!(
        exclusions,
        vec![
            ("2021", ExclusionReason::DateRange),
            ("Arkiv 2022", ExclusionReason::Keyword),
        ]
    );
    assert!(report.errors().is_empty());
    assert_eq!(report.elapsed_fetch_delay(), Duration::from_millis(2));
}

#[tokio::test]
async fn test_failed_subfolder_does_not_stop_siblings() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, html(root_page()), 1).await;
    mount_page(&server, "/reader/r1/channel/a", html(meetings_page()), 1).await;
    mount_page(&server, "/reader/r1/channel/broken", ResponseTemplate::new(503), 1).await;
    mount_page(&server, "/reader/r1/channel/d", html(attachments_page()), 1).await;

    let report = run(&server, 2).await;

    assert_eq!(
        file_names(&report),
        vec![
            "Kallelse.pdf",
            "2022 Möten/Protokoll 2022-03.pdf",
            "2022 Möten/Bilagor/Bilaga 1.pdf",
        ]
    );
    assert_eq!(report.errors().len(), 1);

    let error = &report.errors()[0];
    assert_eq!(error.path, "2022 Möten/Trasig");
    assert_eq!(error.kind, ErrorKind::StaleReference);
    assert!(error.url.ends_with("/reader/r1/channel/broken"));
    assert!(!report.is_degraded());

    // The failed folder keeps its accepted status
    assert!(folder_paths(&report).contains(&"2022 Möten/Trasig"));
    assert!(report.folder_summary().empty.is_empty());
}

#[tokio::test]
async fn test_depth_zero_lists_children_without_fetching() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, html(root_page()), 1).await;
    mount_page(&server, "/reader/r1/channel/a", html(meetings_page()), 0).await;

    let report = run(&server, 0).await;

    assert_eq!(file_names(&report), vec!["Kallelse.pdf"]);
    assert_eq!(folder_paths(&report), vec!["2022 Möten"]);
    assert_eq!(report.folder_summary().not_searched, vec!["2022 Möten"]);
}

#[tokio::test]
async fn test_unreachable_root_gives_degraded_report() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, ResponseTemplate::new(404), 1).await;

    let report = run(&server, 2).await;

    assert!(report.is_degraded());
    assert_eq!(report.root_folder_label(), "Unknown folder");
    assert!(report.files().is_empty());
    assert!(report.subfolders().is_empty());
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].path, "main folder");
    assert_eq!(report.errors()[0].kind, ErrorKind::Other);
}

#[tokio::test]
async fn test_non_html_root_is_rejected() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        ROOT_PATH,
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        1,
    )
    .await;

    let report = run(&server, 1).await;

    assert!(report.is_degraded());
    assert!(report.errors()[0].message.contains("application/json"));
}

#[tokio::test]
async fn test_config_driven_crawl_and_outputs() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, html(root_page()), 1).await;
    mount_page(&server, "/reader/r1/channel/a", html(meetings_page()), 1).await;

    let dir = tempdir().unwrap();
    let summary_path = dir.path().join("report.md");
    let database_path = dir.path().join("report.db");

    let config_content = format!(
        r#"
[crawl]
root-url = "{}{}"
max-depth = 1
exclude = ["ARKIV"]
earliest = "2022-01-01"
latest = "2022-12-31"
pacing-delay = 1

[fetcher]
timeout = 5
"#,
        server.uri(),
        ROOT_PATH
    );
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();
    file.flush().unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    let report = crawler::crawl(&config, &mut TracingProgress).await.unwrap();

    assert_eq!(report.files().len(), 2);
    assert_eq!(report.exclusions().len(), 2);

    write_markdown_report(&report, &summary_path).unwrap();
    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("# Folder Sweep: Protokoll"));
    assert!(markdown.contains("excluded-by-keyword"));
    assert_eq!(markdown, format_markdown_report(&report));

    let report_id = export_to_sqlite(&report, &database_path, Some(&hash)).unwrap();
    assert!(report_id > 0);
    assert!(database_path.exists());
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_fetching() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, html(root_page()), 0).await;

    let fetcher = HttpPageFetcher::new(&FetcherConfig::default()).unwrap();
    let engine = CrawlEngine::new(fetcher);

    let mut reversed = request(&server, 1);
    reversed.requested_range = DateInterval::new(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
    );

    let result = engine.crawl(&reversed, &mut TracingProgress).await;
    assert!(matches!(
        result,
        Err(folder_sweep::SweepError::InvalidRequest(_))
    ));
}
