//! Hours command: time worked per billing period, before pricing.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use inv_core::{PeriodTotal, aggregate};
use serde::Serialize;

use crate::cli::HoursArgs;
use crate::commands::util::format_hours;
use crate::config::Config;
use crate::timesheet::read_timesheet;

#[derive(Debug, Serialize)]
pub struct JsonHours<'a> {
    pub periods: &'a [PeriodTotal],
    pub total_time: f64,
}

/// Runs the hours command.
pub fn run<W: Write>(writer: &mut W, config: &Config, args: &HoursArgs) -> Result<()> {
    let timesheet = read_timesheet(&args.input.timesheet, args.input.time_units(config))?;
    let totals = aggregate(
        &timesheet,
        &args.input.date_range()?,
        args.frequency,
        args.by_project,
    );

    if args.input.json {
        let report = JsonHours {
            periods: &totals,
            total_time: totals.iter().map(|t| t.time_spent).sum(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_hours_table(&totals))?;
    }

    Ok(())
}

/// Formats period totals as a fixed-width table.
pub fn format_hours_table(totals: &[PeriodTotal]) -> String {
    let mut output = String::new();
    writeln!(output, "HOURS").unwrap();

    if totals.is_empty() {
        writeln!(output, "No time logged in range.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<10}  {:<10}  {:<12}  {:>8}",
        "START", "END", "PROJECT", "HOURS"
    )
    .unwrap();
    for total in totals {
        let project = total.period.project.as_ref().map_or("-", |p| p.as_str());
        writeln!(
            output,
            "{:<10}  {:<10}  {:<12}  {:>8}",
            total.period.start_date.format("%Y-%m-%d").to_string(),
            total.period.end_date.format("%Y-%m-%d").to_string(),
            project,
            format_hours(total.time_spent)
        )
        .unwrap();
    }

    let total_time: f64 = totals.iter().map(|t| t.time_spent).sum();
    writeln!(output, "{:<36}  {:>8}", "TOTAL", format_hours(total_time)).unwrap();
    output
}
