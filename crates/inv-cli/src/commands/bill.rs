//! Bill command: tiered cost summary of a timesheet.
//!
//! Renders the per-period, per-tier cost rows either as a fixed-width table
//! or as JSON for an external invoice template.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use inv_core::{
    Biller, BillingOptions, CostSummaryRow, ProjectTotal, invoice_total, totals_by_project,
};
use serde::Serialize;

use crate::cli::BillArgs;
use crate::commands::util::{format_hours, format_money};
use crate::config::Config;
use crate::timesheet::read_timesheet;

/// JSON invoice structure.
#[derive(Debug, Serialize)]
pub struct JsonInvoice<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biller: Option<&'a str>,
    pub rows: &'a [CostSummaryRow],
    pub by_project: Vec<ProjectTotal>,
    pub total_time: f64,
    pub total: f64,
}

/// Runs the bill command.
pub fn run<W: Write>(writer: &mut W, config: &Config, args: &BillArgs) -> Result<()> {
    let biller = config
        .biller
        .as_ref()
        .context("no biller configured; add a [biller] table to the config file")?;

    let timesheet = read_timesheet(&args.input.timesheet, args.input.time_units(config))?;
    let options = BillingOptions {
        date_range: args.input.date_range()?,
        by_project: args.by_project,
        frequency: args.frequency,
    };
    let rows = inv_core::bill(&timesheet, biller, &options).context("failed to bill timesheet")?;

    if args.input.json {
        writeln!(writer, "{}", format_summary_json(biller.name(), &rows)?)?;
    } else {
        write!(writer, "{}", format_summary(&invoice_title(biller), &rows))?;
    }

    Ok(())
}

/// Table title: the biller's name, plus its rate when it bills a single flat rate.
fn invoice_title(biller: &Biller) -> String {
    let mut title = biller.name().map_or_else(
        || "INVOICE".to_string(),
        |name| format!("INVOICE: {name}"),
    );
    if biller.is_flat() {
        if let Some(&rate) = biller.rates().first() {
            write!(title, " (flat {}/h)", format_money(rate)).unwrap();
        }
    }
    title
}

/// Tier column label. Tiers are numbered from 1 for display.
fn tier_label(row: &CostSummaryRow) -> String {
    row.tier_index
        .map_or_else(|| "base".to_string(), |i| (i + 1).to_string())
}

/// Formats cost rows as a fixed-width table with totals.
pub fn format_summary(title: &str, rows: &[CostSummaryRow]) -> String {
    let mut output = String::new();
    writeln!(output, "{title}").unwrap();

    if rows.is_empty() {
        writeln!(output, "No billable time in range.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<10}  {:<10}  {:<12}  {:<4}  {:>8}  {:>8}  {:>10}",
        "START", "END", "PROJECT", "TIER", "HOURS", "RATE", "COST"
    )
    .unwrap();

    for row in rows {
        let project = row.project.as_ref().map_or("-", |p| p.as_str());
        let rate = row.rate.map_or_else(|| "-".to_string(), format_money);
        writeln!(
            output,
            "{:<10}  {:<10}  {:<12}  {:<4}  {:>8}  {:>8}  {:>10}",
            row.start_date.format("%Y-%m-%d").to_string(),
            row.end_date.format("%Y-%m-%d").to_string(),
            project,
            tier_label(row),
            format_hours(row.time_spent),
            rate,
            format_money(row.cost)
        )
        .unwrap();
    }

    let total_time: f64 = rows.iter().map(|r| r.time_spent).sum();
    writeln!(
        output,
        "{:<42}  {:>8}  {:>8}  {:>10}",
        "TOTAL",
        format_hours(total_time),
        "",
        format_money(invoice_total(rows))
    )
    .unwrap();

    if rows.iter().any(|r| r.project.is_some()) {
        writeln!(output, "BY PROJECT").unwrap();
        for total in totals_by_project(rows) {
            let project = total.project.as_ref().map_or("-", |p| p.as_str());
            writeln!(
                output,
                "{:<12}  {:>8}  {:>10}",
                project,
                format_hours(total.time_spent),
                format_money(total.cost)
            )
            .unwrap();
        }
    }

    output
}

/// Formats cost rows as JSON.
pub fn format_summary_json(biller: Option<&str>, rows: &[CostSummaryRow]) -> Result<String> {
    let invoice = JsonInvoice {
        biller,
        rows,
        by_project: totals_by_project(rows),
        total_time: rows.iter().map(|r| r.time_spent).sum(),
        total: invoice_total(rows),
    };
    Ok(serde_json::to_string_pretty(&invoice)?)
}
