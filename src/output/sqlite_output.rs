//! SQLite export of crawl reports
//!
//! Every export appends one row to `reports` and the report's records to the
//! child tables, so one database file can hold the history of many scans.

use crate::report::CrawlReport;
use crate::SweepError;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the export database
pub const SCHEMA_SQL: &str = r#"
-- One row per exported crawl
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    version INTEGER NOT NULL,
    exported_at TEXT NOT NULL,
    config_hash TEXT,
    root_url TEXT NOT NULL,
    root_folder_label TEXT NOT NULL,
    max_depth INTEGER NOT NULL,
    range_start TEXT NOT NULL,
    range_end TEXT NOT NULL,
    elapsed_total_ms INTEGER NOT NULL,
    elapsed_fetch_delay_ms INTEGER NOT NULL
);

-- Root page breadcrumb, outermost first
CREATE TABLE IF NOT EXISTS breadcrumbs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    position INTEGER NOT NULL,
    label TEXT NOT NULL,
    url TEXT
);

-- Documents found during the crawl
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    display_name TEXT NOT NULL,
    url TEXT NOT NULL,
    folder_location TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_files_report ON files(report_id);

-- Accepted folders
CREATE TABLE IF NOT EXISTS folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    path TEXT NOT NULL,
    url TEXT NOT NULL,
    depth INTEGER NOT NULL,
    range_start TEXT,
    range_end TEXT,
    summary TEXT
);

CREATE INDEX IF NOT EXISTS idx_folders_report ON folders(report_id);

-- Folders skipped by keyword or date
CREATE TABLE IF NOT EXISTS exclusions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    path TEXT NOT NULL,
    url TEXT NOT NULL,
    reason TEXT NOT NULL
);

-- Folders whose page could not be fetched
CREATE TABLE IF NOT EXISTS errors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    path TEXT NOT NULL,
    url TEXT NOT NULL,
    kind TEXT NOT NULL,
    message TEXT NOT NULL,
    suggested_action TEXT NOT NULL
);
"#;

/// Writes crawl reports into a SQLite database
pub struct SqliteExporter {
    conn: Connection,
}

impl SqliteExporter {
    /// Opens (or creates) the export database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteExporter)` - Successfully opened/created database
    /// * `Err(SweepError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SweepError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SweepError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Stores one report and all of its records in a single transaction
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl report
    /// * `config_hash` - Hash of the configuration file, if the crawl came from one
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - Row id of the new `reports` row
    /// * `Err(SweepError)` - The export failed and nothing was stored
    pub fn export(&mut self, report: &CrawlReport, config_hash: Option<&str>) -> Result<i64, SweepError> {
        let tx = self.conn.transaction()?;

        let range = report.requested_range();
        tx.execute(
            "INSERT INTO reports (version, exported_at, config_hash, root_url, root_folder_label,
                                  max_depth, range_start, range_end, elapsed_total_ms, elapsed_fetch_delay_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                report.version(),
                Utc::now().to_rfc3339(),
                config_hash,
                report.root_url(),
                report.root_folder_label(),
                report.max_depth(),
                range.start.to_string(),
                range.end.to_string(),
                duration_ms(report.elapsed_total()),
                duration_ms(report.elapsed_fetch_delay()),
            ],
        )?;
        let report_id = tx.last_insert_rowid();

        for (position, entry) in report.breadcrumb().iter().enumerate() {
            tx.execute(
                "INSERT INTO breadcrumbs (report_id, position, label, url) VALUES (?1, ?2, ?3, ?4)",
                params![report_id, position as i64, entry.label, entry.url],
            )?;
        }

        for file in report.files() {
            tx.execute(
                "INSERT INTO files (report_id, display_name, url, folder_location) VALUES (?1, ?2, ?3, ?4)",
                params![report_id, file.display_name, file.url, file.folder_location],
            )?;
        }

        let summary = report.folder_summary();
        for folder in report.subfolders() {
            let label = if summary.empty.contains(&folder.path) {
                Some("empty")
            } else if summary.intermediate.contains(&folder.path) {
                Some("intermediate")
            } else if summary.not_searched.contains(&folder.path) {
                Some("not-searched")
            } else {
                None
            };

            tx.execute(
                "INSERT INTO folders (report_id, path, url, depth, range_start, range_end, summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    report_id,
                    folder.path,
                    folder.url,
                    folder.depth,
                    folder.date_interval.map(|i| i.start.to_string()),
                    folder.date_interval.map(|i| i.end.to_string()),
                    label,
                ],
            )?;
        }

        for exclusion in report.exclusions() {
            tx.execute(
                "INSERT INTO exclusions (report_id, path, url, reason) VALUES (?1, ?2, ?3, ?4)",
                params![report_id, exclusion.path, exclusion.url, exclusion.reason.as_str()],
            )?;
        }

        for error in report.errors() {
            tx.execute(
                "INSERT INTO errors (report_id, path, url, kind, message, suggested_action)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    report_id,
                    error.path,
                    error.url,
                    error.kind.as_str(),
                    error.message,
                    error.suggested_action,
                ],
            )?;
        }

        tx.commit()?;

        tracing::debug!(
            "Exported report {} ({} files, {} folders)",
            report_id,
            report.files().len(),
            report.subfolders().len()
        );
        Ok(report_id)
    }

    /// Number of rows in `table` belonging to `report_id`
    pub fn count_rows(&self, table: &str, report_id: i64) -> Result<i64, SweepError> {
        let column = if table == "reports" { "id" } else { "report_id" };
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", table, column),
            params![report_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn duration_ms(duration: std::time::Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Exports `report` to the database at `path`
///
/// # Returns
///
/// * `Ok(i64)` - Row id of the stored report
/// * `Err(SweepError)` - Failed to open or write the database
pub fn export_to_sqlite(
    report: &CrawlReport,
    path: &Path,
    config_hash: Option<&str>,
) -> Result<i64, SweepError> {
    let mut exporter = SqliteExporter::new(path)?;
    let id = exporter.export(report, config_hash)?;
    tracing::info!("SQLite export written to {} (report {})", path.display(), id);
    Ok(id)
}
