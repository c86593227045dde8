//! Reading timesheets from CSV files.
//!
//! A timesheet CSV has a header row with at least the columns `date`,
//! `project`, and `time_spent`. Other columns (descriptions, tags, ...) are
//! ignored.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use inv_core::{ProjectId, TimeEntry, Timesheet};
use serde::{Deserialize, Serialize};

use crate::commands::util::parse_date;

/// Unit the `time_spent` column is recorded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum TimeUnits {
    /// Hours.
    #[default]
    #[serde(rename = "h")]
    #[value(name = "h")]
    Hours,

    /// Minutes.
    #[serde(rename = "min")]
    #[value(name = "min")]
    Minutes,
}

impl TimeUnits {
    /// Converts a value in these units to hours.
    pub fn to_hours(self, value: f64) -> f64 {
        match self {
            Self::Hours => value,
            Self::Minutes => value / 60.0,
        }
    }
}

impl fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hours => write!(f, "h"),
            Self::Minutes => write!(f, "min"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimesheetRow {
    date: String,
    project: String,
    time_spent: f64,
}

/// Reads and validates a timesheet CSV file.
pub fn read_timesheet(path: &Path, units: TimeUnits) -> Result<Timesheet> {
    let file = File::open(path)
        .with_context(|| format!("failed to open timesheet: {}", path.display()))?;
    parse_timesheet(file, units)
        .with_context(|| format!("failed to read timesheet: {}", path.display()))
}

/// Parses timesheet CSV data, converting `time_spent` to hours.
///
/// The returned timesheet is sorted by date.
pub fn parse_timesheet<R: Read>(input: R, units: TimeUnits) -> Result<Timesheet> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let mut entries = Vec::new();
    for (i, result) in reader.deserialize::<TimesheetRow>().enumerate() {
        // Line 1 is the header
        let line = i + 2;
        let row = result.with_context(|| format!("malformed row on line {line}"))?;
        let date = parse_date(&row.date).with_context(|| format!("bad date on line {line}"))?;
        let project =
            ProjectId::new(row.project).with_context(|| format!("bad project on line {line}"))?;
        let entry = TimeEntry::new(date, project, units.to_hours(row.time_spent))
            .with_context(|| format!("bad time_spent on line {line}"))?;
        entries.push(entry);
    }

    let timesheet = Timesheet::new(entries);
    tracing::debug!(entries = timesheet.len(), %units, "read timesheet");
    Ok(timesheet)
}
