//! Core billing engine for invoicing from timesheets.
//!
//! This crate contains the pure logic for:
//! - Decomposition: splitting hours across ordered rate tiers
//! - Billers: tiered hourly cost functions with an optional base fee
//! - Aggregation: summing timesheet hours per billing period and project
//! - Cost summaries: per-tier time, rate, and cost for each period

mod aggregate;
mod biller;
mod billing;
mod decompose;
mod error;
pub mod frequency;
mod project_rates;
mod summary;
pub mod timesheet;
pub mod types;

pub use aggregate::{Period, PeriodTotal, aggregate};
pub use biller::{Biller, BillerConfig, CostFunction};
pub use billing::{BillingOptions, bill};
pub use decompose::{capacity, decompose};
pub use error::BillingError;
pub use frequency::{Frequency, FrequencyUnit, UnknownFrequency};
pub use project_rates::bill_at_project_rates;
pub use summary::{CostSummaryRow, ProjectTotal, invoice_total, summarize, totals_by_project};
pub use timesheet::{DateRange, TimeEntry, Timesheet};
pub use types::{ProjectId, ValidationError};
