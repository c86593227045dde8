//! Timesheets: dated, per-project logs of time spent.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::BillingError;
use crate::types::{ProjectId, ValidationError};

/// A single block of time worked on a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    /// Day the work happened.
    pub date: NaiveDate,

    /// Project the time is billed to.
    pub project: ProjectId,

    /// Hours spent. Always finite and non-negative.
    pub time_spent: f64,
}

impl TimeEntry {
    /// Creates an entry, rejecting negative or non-finite hours.
    pub fn new(date: NaiveDate, project: ProjectId, time_spent: f64) -> Result<Self, ValidationError> {
        if !time_spent.is_finite() || time_spent < 0.0 {
            return Err(ValidationError::InvalidTimeSpent { value: time_spent });
        }
        Ok(Self {
            date,
            project,
            time_spent,
        })
    }
}

/// Inclusive date bounds. A missing endpoint leaves that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting a start that falls after the end.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, BillingError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(BillingError::Configuration(format!(
                    "date range starts on {s} which is after its end {e}"
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// A range with no bounds on either side.
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Whether `date` lies within the range, inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| s <= date) && self.end.is_none_or(|e| date <= e)
    }
}

/// Time entries ordered by date ascending.
///
/// Entries on the same date keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timesheet {
    entries: Vec<TimeEntry>,
}

impl Timesheet {
    /// Builds a timesheet, sorting the entries by date.
    pub fn new(mut entries: Vec<TimeEntry>) -> Self {
        entries.sort_by_key(|e| e.date);
        Self { entries }
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest and latest entry dates, or `None` for an empty timesheet.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.entries.first()?;
        let last = self.entries.last()?;
        Some((first.date, last.date))
    }

    /// Distinct projects, in order.
    pub fn projects(&self) -> BTreeSet<&ProjectId> {
        self.entries.iter().map(|e| &e.project).collect()
    }

    /// Total hours across every entry.
    pub fn total_time(&self) -> f64 {
        self.entries.iter().map(|e| e.time_spent).sum()
    }

    /// Returns the entries that fall inside `range`.
    pub fn slice(&self, range: &DateRange) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|e| range.contains(e.date))
            .cloned()
            .collect();
        Self { entries }
    }
}

impl FromIterator<TimeEntry> for Timesheet {
    fn from_iter<I: IntoIterator<Item = TimeEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
