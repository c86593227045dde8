//! CLI subcommand implementations.

pub mod bill;
pub mod hours;
pub mod project_rates;
pub mod util;
