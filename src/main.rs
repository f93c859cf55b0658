//! folder-sweep main entry point
//!
//! This is the command-line interface for the folder-sweep archive crawler.

use chrono::NaiveDate;
use clap::Parser;
use folder_sweep::config::{load_config_with_hash, validate, Config};
use folder_sweep::crawler::{crawl, ProgressSink};
use folder_sweep::output::{
    export_to_sqlite, print_errors, print_statistics, write_markdown_report, CrawlStatistics,
};
use folder_sweep::report::{CrawlReport, Selection};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// folder-sweep: a polite crawler for hierarchical document archives
///
/// folder-sweep walks a web-published folder tree from a starting folder,
/// skips folders by keyword or by the dates in their names, and lists every
/// document it finds.
#[derive(Parser, Debug)]
#[command(name = "folder-sweep")]
#[command(version)]
#[command(about = "A polite crawler for hierarchical document archives", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Root folder URL (overrides crawl.root-url)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Maximum folder depth (overrides crawl.max-depth)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Denylist term; repeat for several (replaces crawl.exclude)
    #[arg(long = "exclude", value_name = "TERM")]
    exclude: Vec<String>,

    /// Earliest date of interest, YYYY-MM-DD (overrides crawl.earliest)
    #[arg(long = "from", value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Latest date of interest, YYYY-MM-DD (overrides crawl.latest)
    #[arg(long = "to", value_name = "DATE")]
    to: Option<NaiveDate>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Only list files whose name contains TEXT (repeatable)
    #[arg(long, value_name = "TEXT")]
    include: Vec<String>,

    /// Leave out files whose name contains TEXT (repeatable)
    #[arg(long, value_name = "TEXT")]
    drop: Vec<String>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.crawl.root_url = url.clone();
        }
        if let Some(max_depth) = self.max_depth {
            config.crawl.max_depth = max_depth;
        }
        if !self.exclude.is_empty() {
            config.crawl.exclude = self.exclude.clone();
        }
        if self.from.is_some() {
            config.crawl.earliest = self.from;
        }
        if self.to.is_some() {
            config.crawl.latest = self.to;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid command-line override: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = handle_crawl(&config, cli.quiet).await?;

    if !cli.quiet {
        println!();
        print_statistics(&CrawlStatistics::from_report(&report));
        if !report.errors().is_empty() {
            println!("\nFailed folders:");
            print_errors(&report);
        }
    }

    write_outputs(&config, &report, &config_hash)?;

    if !cli.include.is_empty() || !cli.drop.is_empty() {
        print_selection(&report, &cli.include, &cli.drop);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("folder_sweep=info,warn"),
            1 => EnvFilter::new("folder_sweep=debug,info"),
            2 => EnvFilter::new("folder_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Progress sink drawing an `indicatif` bar over folder depth
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(quiet: bool) -> Self {
        if quiet {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(1);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn report(&mut self, done: u64, total: u64, message: &str) {
        self.bar.set_length(total);
        self.bar.set_position(done);
        self.bar.set_message(message.to_string());
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    let request = config.crawl.to_request();

    println!("=== folder-sweep Dry Run ===\n");

    println!("Crawl:");
    println!("  Root URL: {}", request.root_url);
    println!("  Max depth: {}", request.max_depth);
    println!("  Date range: {}", request.requested_range);
    println!("  Pacing delay: {}ms", request.pacing_delay.as_millis());

    println!("\nExcluded terms ({}):", request.denylist.len());
    for term in &request.denylist {
        println!("  - {}", term);
    }

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout);
    println!(
        "  Document links: {} + {}",
        config.fetcher.document_path, config.fetcher.document_param
    );
    println!("  Folder links: {}", config.fetcher.folder_path);
    println!("  Breadcrumb: {}", config.fetcher.breadcrumb_selector);

    println!("\nOutput:");
    println!(
        "  Summary: {}",
        config.output.summary_path.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Database: {}",
        config.output.database_path.as_deref().unwrap_or("(none)")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    quiet: bool,
) -> Result<CrawlReport, Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} to depth {} ({} excluded terms)",
        config.crawl.root_url,
        config.crawl.max_depth,
        config.crawl.exclude.len()
    );

    let mut progress = BarProgress::new(quiet);
    let result = crawl(config, &mut progress).await;
    progress.bar.finish_and_clear();

    match result {
        Ok(report) => {
            if report.is_degraded() {
                tracing::warn!("Root folder could not be fetched; the report is empty");
            }
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Writes the markdown report and SQLite export when configured
fn write_outputs(
    config: &Config,
    report: &CrawlReport,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &config.output.summary_path {
        write_markdown_report(report, Path::new(path))?;
        println!("✓ Report written to: {}", path);
    }

    if let Some(path) = &config.output.database_path {
        export_to_sqlite(report, Path::new(path), Some(config_hash))?;
        println!("✓ Report exported to: {}", path);
    }

    Ok(())
}

/// Prints the links of the files left after --include/--drop filtering
fn print_selection(report: &CrawlReport, include: &[String], drop: &[String]) {
    let mut selection = Selection::new(report);

    if !include.is_empty() {
        selection.deselect_all();
        for text in include {
            selection.select_matching(text);
        }
    }
    for text in drop {
        selection.deselect_matching(text);
    }

    println!(
        "\nSelected files ({} of {}):",
        selection.selected_count(),
        report.files().len()
    );
    for file in selection.selected() {
        println!("  {}\n    {}", file.display_name, file.url);
    }
}
