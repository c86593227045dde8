//! Invoicing CLI library.
//!
//! This crate provides the CLI interface for billing timesheets: argument
//! parsing, configuration, CSV timesheet reading, and rendering.

mod cli;
pub mod commands;
mod config;
pub mod timesheet;

pub use cli::{BillArgs, Cli, Commands, HoursArgs, ProjectRatesArgs, TimesheetArgs};
pub use config::Config;
