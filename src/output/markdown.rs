//! Markdown report generation
//!
//! This module renders a finished crawl report as a human-readable markdown
//! document: run information, files grouped by folder, folder summary,
//! exclusions and failed folders.

use crate::report::{CrawlReport, ROOT_LOCATION};
use crate::SweepError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown rendering of `report` to `output_path`
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(SweepError)` - Failed to write the file
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> Result<(), SweepError> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Markdown report written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str(&format!("# Folder Sweep: {}\n\n", report.root_folder_label()));

    if report.is_degraded() {
        md.push_str("> **The root folder could not be fetched.** See Failed Folders below.\n\n");
    }

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", report.root_url()));
    if !report.breadcrumb().is_empty() {
        let trail: Vec<&str> = report
            .breadcrumb()
            .iter()
            .map(|entry| entry.label.as_str())
            .collect();
        md.push_str(&format!("- **Location**: {}\n", trail.join(" / ")));
    }
    md.push_str(&format!("- **Max Depth**: {}\n", report.max_depth()));
    md.push_str(&format!("- **Date Range**: {}\n", report.requested_range()));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds ({:.1} seconds pacing)\n",
        report.elapsed_total().as_secs_f64(),
        report.elapsed_fetch_delay().as_secs_f64()
    ));
    md.push_str(&format!("- **Report Version**: {}\n\n", report.version()));

    // Totals
    md.push_str("## Overview\n\n");
    md.push_str("| Item | Count |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| Files | {} |\n", report.files().len()));
    md.push_str(&format!("| Folders | {} |\n", report.folder_count()));
    md.push_str(&format!("| Excluded Folders | {} |\n", report.exclusions().len()));
    md.push_str(&format!("| Failed Folders | {} |\n\n", report.errors().len()));

    // Files, grouped by folder in discovery order
    md.push_str("## Files\n\n");
    if report.files().is_empty() {
        md.push_str("No files found.\n\n");
    } else {
        let mut locations: Vec<&str> = Vec::new();
        for file in report.files() {
            if !locations.contains(&file.folder_location.as_str()) {
                locations.push(&file.folder_location);
            }
        }

        for location in locations {
            let heading = if location == ROOT_LOCATION {
                report.root_folder_label()
            } else {
                location
            };
            md.push_str(&format!("### {}\n\n", heading));
            for file in report.files_in(location) {
                md.push_str(&format!("- [{}]({})\n", file.display_name, file.url));
            }
            md.push('\n');
        }
    }

    // Folder summary
    let summary = report.folder_summary();
    if !summary.empty.is_empty() || !summary.intermediate.is_empty() || !summary.not_searched.is_empty()
    {
        md.push_str("## Folder Summary\n\n");
        for (title, paths) in [
            ("Empty", &summary.empty),
            ("Sub-folders only", &summary.intermediate),
            ("Not searched (beyond max depth)", &summary.not_searched),
        ] {
            if paths.is_empty() {
                continue;
            }
            md.push_str(&format!("### {} ({})\n\n", title, paths.len()));
            for path in paths {
                md.push_str(&format!("- {}\n", path));
            }
            md.push('\n');
        }
    }

    // Exclusions
    if !report.exclusions().is_empty() {
        md.push_str("## Excluded Folders\n\n");
        md.push_str("| Folder | Reason |\n");
        md.push_str("|--------|--------|\n");
        for exclusion in report.exclusions() {
            md.push_str(&format!(
                "| [{}]({}) | {} |\n",
                exclusion.path, exclusion.url, exclusion.reason
            ));
        }
        md.push('\n');
    }

    // Errors
    if !report.errors().is_empty() {
        md.push_str("## Failed Folders\n\n");
        for error in report.errors() {
            md.push_str(&format!(
                "- **{}** ({}): {}\n  - {}\n  - {}\n",
                error.path, error.kind, error.message, error.url, error.suggested_action
            ));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(&format!(
        "*Generated by folder-sweep {}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    md
}
