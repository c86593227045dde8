//! Project-rates command: each project billed at its own flat hourly rate.

use std::io::Write;

use anyhow::{Context, Result};
use inv_core::bill_at_project_rates;

use crate::cli::ProjectRatesArgs;
use crate::commands::bill::{format_summary, format_summary_json};
use crate::config::Config;
use crate::timesheet::read_timesheet;

/// Runs the project-rates command.
pub fn run<W: Write>(writer: &mut W, config: &Config, args: &ProjectRatesArgs) -> Result<()> {
    let timesheet = read_timesheet(&args.input.timesheet, args.input.time_units(config))?;
    let rows = bill_at_project_rates(&timesheet, &config.project_rates, &args.input.date_range()?)
        .context("failed to bill at project rates")?;

    if args.input.json {
        writeln!(writer, "{}", format_summary_json(None, &rows)?)?;
    } else {
        write!(writer, "{}", format_summary("INVOICE: project rates", &rows))?;
    }

    Ok(())
}
