//! Shared utilities for CLI commands.

use anyhow::bail;
use chrono::NaiveDate;

/// Date formats accepted on the command line and in timesheets.
const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// Parse a date as either compact `YYYYMMDD` or ISO `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = s.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    bail!("Invalid date: {s}. Use YYYYMMDD (e.g., 20160416) or YYYY-MM-DD (e.g., 2016-04-16)")
}

/// Formats hours with two decimals.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// Formats an amount of money with two decimals.
///
/// Currency symbols and localization are left to whoever renders the invoice.
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}
