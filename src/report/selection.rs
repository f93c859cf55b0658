//! File selection over a finished report
//!
//! Every file starts selected. Matching is a case-insensitive substring test
//! on the display name; an empty or blank filter text changes nothing.

use crate::report::{CrawlReport, FileEntry};

/// Selection state for the files of one report
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    files: &'a [FileEntry],
    selected: Vec<bool>,
}

impl<'a> Selection<'a> {
    /// Selects every file in the report
    pub fn new(report: &'a CrawlReport) -> Self {
        Self::from_files(report.files())
    }

    pub fn from_files(files: &'a [FileEntry]) -> Self {
        Self {
            files,
            selected: vec![true; files.len()],
        }
    }

    pub fn select_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = true);
    }

    pub fn deselect_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    /// Adds every file whose name contains `text`; returns how many matched
    pub fn select_matching(&mut self, text: &str) -> usize {
        self.set_matching(text, true)
    }

    /// Removes every file whose name contains `text`; returns how many matched
    pub fn deselect_matching(&mut self, text: &str) -> usize {
        self.set_matching(text, false)
    }

    fn set_matching(&mut self, text: &str, value: bool) -> usize {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return 0;
        }

        let mut matched = 0;
        for (file, selected) in self.files.iter().zip(self.selected.iter_mut()) {
            if file.display_name.to_lowercase().contains(&needle) {
                *selected = value;
                matched += 1;
            }
        }
        matched
    }

    /// Selected files in report order
    pub fn selected(&self) -> impl Iterator<Item = &'a FileEntry> + '_ {
        self.files
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, selected)| **selected)
            .map(|(file, _)| file)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    /// URLs of the selected files in report order
    pub fn selected_urls(&self) -> Vec<&'a str> {
        self.selected().map(|file| file.url.as_str()).collect()
    }
}
