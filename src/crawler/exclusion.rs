//! Folder exclusion rules
//!
//! A discovered folder is traversed unless its name contains a denylisted
//! term or its date interval misses the requested range. The keyword test
//! runs first and short-circuits the date test.

use crate::dates::{DateInterval, FolderDate};
use crate::report::ExclusionReason;

/// Outcome of evaluating one discovered folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Include {
        /// The interval the date test was run against
        effective: DateInterval,
        /// The interval this folder hands down to its children
        inherit: Option<DateInterval>,
    },
    Exclude {
        reason: ExclusionReason,
    },
}

impl Decision {
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Include { .. })
    }

    pub fn inherit(&self) -> Option<DateInterval> {
        match self {
            Self::Include { inherit, .. } => *inherit,
            Self::Exclude { .. } => None,
        }
    }
}

/// Applies the operator's denylist and requested date range
#[derive(Debug, Clone)]
pub struct ExclusionEvaluator {
    denylist: Vec<String>,
    requested: DateInterval,
}

impl ExclusionEvaluator {
    /// Creates an evaluator; terms are matched case-insensitively and blank
    /// terms are ignored
    pub fn new(denylist: &[String], requested: DateInterval) -> Self {
        let denylist = denylist
            .iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self {
            denylist,
            requested,
        }
    }

    pub fn requested(&self) -> DateInterval {
        self.requested
    }

    /// Returns the first denylist term contained in `folder_name`
    pub fn matched_keyword(&self, folder_name: &str) -> Option<&str> {
        let name = folder_name.to_lowercase();
        self.denylist
            .iter()
            .find(|term| name.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Decides whether a folder is traversed
    ///
    /// * `candidate` - date parsed from the folder's own name
    /// * `inherited` - exact-day interval handed down by an ancestor, if any
    ///
    /// A folder named after an exact day (`YYYY-MM-DD`) is judged by its own
    /// date and hands that date down to its children. Any other folder,
    /// including a one-day explicit range, is judged by the inherited date
    /// when there is one, else by its own interval, and hands nothing down.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use folder_sweep::crawler::ExclusionEvaluator;
    /// use folder_sweep::dates::{DateInterval, DateRangeParser};
    ///
    /// let requested = DateInterval::new(
    ///     NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
    /// );
    /// let evaluator = ExclusionEvaluator::new(&["arkiv".to_string()], requested);
    /// let parser = DateRangeParser::default();
    ///
    /// for (name, included) in [("2022 Möten", true), ("2021", false), ("Arkiv 2022", false)] {
    ///     let decision = evaluator.evaluate(name, parser.parse_folder(name), None);
    ///     assert_eq!(decision.is_included(), included);
    /// }
    /// ```
    pub fn evaluate(
        &self,
        folder_name: &str,
        candidate: FolderDate,
        inherited: Option<DateInterval>,
    ) -> Decision {
        if self.matched_keyword(folder_name).is_some() {
            return Decision::Exclude {
                reason: ExclusionReason::Keyword,
            };
        }

        let own_exact = candidate.rule.propagates();
        let effective = match inherited {
            Some(interval) if !own_exact => interval,
            _ => candidate.interval,
        };

        if !self.requested.overlaps(&effective) {
            return Decision::Exclude {
                reason: ExclusionReason::DateRange,
            };
        }

        Decision::Include {
            effective,
            inherit: own_exact.then_some(candidate.interval),
        }
    }
}
