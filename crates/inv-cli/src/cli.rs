//! Command-line argument definitions.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inv_core::{DateRange, Frequency};

use crate::Config;
use crate::commands::util::parse_date;
use crate::timesheet::TimeUnits;

/// Invoices from timesheets.
///
/// Reads a CSV timesheet, groups the time into billing periods, and prices
/// each period with a tiered hourly rate.
#[derive(Debug, Parser)]
#[command(name = "inv", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bill a timesheet with the configured tiered biller.
    Bill(BillArgs),

    /// Show hours worked per billing period.
    Hours(HoursArgs),

    /// Bill each project at its configured flat hourly rate.
    ProjectRates(ProjectRatesArgs),
}

/// Timesheet input shared by every subcommand.
#[derive(Debug, Args)]
pub struct TimesheetArgs {
    /// Path to the timesheet CSV.
    pub timesheet: PathBuf,

    /// First day to bill, inclusive (YYYYMMDD or YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day to bill, inclusive (YYYYMMDD or YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Unit of the time_spent column. Overrides the config file.
    #[arg(long, value_enum)]
    pub time_units: Option<TimeUnits>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl TimesheetArgs {
    pub fn date_range(&self) -> Result<DateRange> {
        Ok(DateRange::new(self.start, self.end)?)
    }

    pub fn time_units(&self, config: &Config) -> TimeUnits {
        self.time_units.unwrap_or(config.time_units)
    }
}

/// Arguments for `inv bill`.
#[derive(Debug, Args)]
pub struct BillArgs {
    #[command(flatten)]
    pub input: TimesheetArgs,

    /// Billing period, e.g. W, 2W, M. Overrides the biller's frequency.
    #[arg(short, long)]
    pub frequency: Option<Frequency>,

    /// Bill each project separately.
    #[arg(long)]
    pub by_project: bool,
}

/// Arguments for `inv hours`.
#[derive(Debug, Args)]
pub struct HoursArgs {
    #[command(flatten)]
    pub input: TimesheetArgs,

    /// Period to group hours by, e.g. D, W, M. Defaults to the whole range.
    #[arg(short, long)]
    pub frequency: Option<Frequency>,

    /// Break hours down per project.
    #[arg(long)]
    pub by_project: bool,
}

/// Arguments for `inv project-rates`.
#[derive(Debug, Args)]
pub struct ProjectRatesArgs {
    #[command(flatten)]
    pub input: TimesheetArgs,
}
