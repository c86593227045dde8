//! Aggregating timesheet entries into billing periods.
//!
//! # Algorithm Summary
//!
//! 1. Slice the timesheet to the requested date range
//! 2. Build the period windows: one window spanning the data, or contiguous
//!    calendar windows of the requested frequency
//! 3. Assign each entry to its window (entries are date-ordered, so windows are
//!    found by binary search) and sum hours per window, optionally per project
//! 4. Emit every window, including those with no entries

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::frequency::Frequency;
use crate::timesheet::{DateRange, Timesheet};
use crate::types::ProjectId;

/// A date interval, inclusive on both ends, over which time is billed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Set when aggregating per project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
}

/// Hours worked in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    #[serde(flatten)]
    pub period: Period,
    pub time_spent: f64,
}

/// Sums time per billing period.
///
/// * Without a `frequency`, each key gets a single period spanning the first to
///   the last entry date inside `range`.
/// * With a `frequency`, the span from `range.start` (or the first entry) to
///   `range.end` (or the last entry) is cut into calendar periods, and every
///   period is emitted even when no time was logged in it.
/// * With `by_project`, every period is emitted once per project that has
///   entries in `range`, ordered by project. All projects share the same
///   windows, so a project also gets zero-hour periods before its first and
///   after its last entry. A biller with a base fee charges that fee for each
///   of those periods.
///
/// An empty timesheet, or one with no entries inside `range`, yields no periods.
pub fn aggregate(
    timesheet: &Timesheet,
    range: &DateRange,
    frequency: Option<Frequency>,
    by_project: bool,
) -> Vec<PeriodTotal> {
    let sliced = timesheet.slice(range);
    let Some((first, last)) = sliced.date_span() else {
        tracing::debug!("no timesheet entries in range");
        return Vec::new();
    };

    let windows = match frequency {
        Some(freq) => freq.periods(range.start.unwrap_or(first), range.end.unwrap_or(last)),
        None => vec![(first, last)],
    };

    let keys: Vec<Option<&ProjectId>> = if by_project {
        sliced.projects().into_iter().map(Some).collect()
    } else {
        vec![None]
    };

    let mut sums: HashMap<(usize, Option<&ProjectId>), f64> = HashMap::new();
    for entry in sliced.entries() {
        // Windows are ordered and cover every entry date, so this never underflows
        let window = windows
            .partition_point(|(start, _)| *start <= entry.date)
            .saturating_sub(1);
        let key = by_project.then_some(&entry.project);
        *sums.entry((window, key)).or_insert(0.0) += entry.time_spent;
    }

    let totals: Vec<PeriodTotal> = windows
        .iter()
        .enumerate()
        .flat_map(|(i, &(start_date, end_date))| {
            let sums = &sums;
            keys.iter().map(move |key| PeriodTotal {
                period: Period {
                    start_date,
                    end_date,
                    project: key.cloned(),
                },
                time_spent: sums.get(&(i, *key)).copied().unwrap_or(0.0),
            })
        })
        .collect();

    tracing::debug!(
        entries = sliced.len(),
        periods = windows.len(),
        rows = totals.len(),
        ?frequency,
        by_project,
        "aggregated timesheet"
    );

    totals
}
