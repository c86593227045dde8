//! Tiered hourly billing.
//!
//! A [`Biller`] is an immutable record of tier widths, per-tier hourly rates,
//! a base fee, and an optional billing cadence. Evaluating it is a pure
//! function of the hours worked in one period:
//!
//! ```text
//! cost(x) = base_fee + Σ rate_i * decompose(x, bins)_i
//! ```
//!
//! A flat hourly rate is simply a biller with one unbounded tier.

use serde::{Deserialize, Serialize};

use crate::decompose::decompose;
use crate::error::BillingError;
use crate::frequency::Frequency;

/// A cost function that can be broken down tier by tier.
///
/// The cost summarizer only needs the tier widths, the base fee, and the
/// ability to evaluate total cost at any cumulative number of hours, so
/// billers with extra side conditions can be summarized the same way.
pub trait CostFunction: Send + Sync {
    /// Tier widths in hours. The last may be `f64::INFINITY`.
    fn bins(&self) -> &[f64];

    /// Fixed amount charged per period regardless of time worked.
    fn base_fee(&self) -> f64;

    /// Total cost of `hours` worked in one period.
    fn cost(&self, hours: f64) -> Result<f64, BillingError>;
}

/// Serialized form of a [`Biller`], as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillerConfig {
    /// Label shown on invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Fixed fee charged once per period.
    #[serde(default)]
    pub base_fee: f64,

    /// Tier widths in hours.
    pub bins: Vec<f64>,

    /// Hourly rate for each tier.
    pub rates: Vec<f64>,

    /// Cadence at which time is aggregated before billing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

/// A validated tiered-rate biller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BillerConfig", into = "BillerConfig")]
pub struct Biller {
    name: Option<String>,
    base_fee: f64,
    bins: Vec<f64>,
    rates: Vec<f64>,
    frequency: Option<Frequency>,
}

impl Biller {
    /// Creates a biller with the given tier widths and rates, no base fee,
    /// and no cadence.
    pub fn new(bins: Vec<f64>, rates: Vec<f64>) -> Result<Self, BillingError> {
        validate_tiers(&bins, &rates)?;
        Ok(Self {
            name: None,
            base_fee: 0.0,
            bins,
            rates,
            frequency: None,
        })
    }

    /// A single unbounded tier billed at `rate` per hour.
    pub fn flat(rate: f64) -> Result<Self, BillingError> {
        Self::new(vec![f64::INFINITY], vec![rate])
    }

    /// Sets the fixed per-period fee.
    pub fn with_base_fee(mut self, base_fee: f64) -> Result<Self, BillingError> {
        validate_base_fee(base_fee)?;
        self.base_fee = base_fee;
        Ok(self)
    }

    #[must_use]
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub const fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Whether this biller is a plain hourly rate with no base fee.
    pub fn is_flat(&self) -> bool {
        self.bins.len() == 1 && self.bins[0].is_infinite() && self.base_fee == 0.0
    }
}

impl CostFunction for Biller {
    fn bins(&self) -> &[f64] {
        &self.bins
    }

    fn base_fee(&self) -> f64 {
        self.base_fee
    }

    fn cost(&self, hours: f64) -> Result<f64, BillingError> {
        let parts = decompose(hours, &self.bins)?;
        let tiered: f64 = parts
            .iter()
            .zip(&self.rates)
            .map(|(part, rate)| part * rate)
            .sum();
        Ok(self.base_fee + tiered)
    }
}

impl TryFrom<BillerConfig> for Biller {
    type Error = BillingError;

    fn try_from(config: BillerConfig) -> Result<Self, Self::Error> {
        let mut biller = Self::new(config.bins, config.rates)?.with_base_fee(config.base_fee)?;
        biller.name = config.name;
        biller.frequency = config.frequency;
        Ok(biller)
    }
}

impl From<Biller> for BillerConfig {
    fn from(biller: Biller) -> Self {
        Self {
            name: biller.name,
            base_fee: biller.base_fee,
            bins: biller.bins,
            rates: biller.rates,
            frequency: biller.frequency,
        }
    }
}

fn validate_tiers(bins: &[f64], rates: &[f64]) -> Result<(), BillingError> {
    if bins.is_empty() {
        return Err(BillingError::Configuration(
            "a biller needs at least one tier".to_string(),
        ));
    }
    if bins.len() != rates.len() {
        return Err(BillingError::Configuration(format!(
            "{} tier widths but {} rates",
            bins.len(),
            rates.len()
        )));
    }

    let last = bins.len() - 1;
    for (i, &width) in bins.iter().enumerate() {
        if width.is_nan() || width < 0.0 {
            return Err(BillingError::Configuration(format!(
                "tier {i} has invalid width {width}"
            )));
        }
        if width.is_infinite() && i != last {
            return Err(BillingError::Configuration(format!(
                "tier {i} is unbounded but is not the last tier"
            )));
        }
    }

    for (i, &rate) in rates.iter().enumerate() {
        if !rate.is_finite() || rate < 0.0 {
            return Err(BillingError::Configuration(format!(
                "tier {i} has invalid rate {rate}"
            )));
        }
    }

    Ok(())
}

fn validate_base_fee(base_fee: f64) -> Result<(), BillingError> {
    if !base_fee.is_finite() || base_fee < 0.0 {
        return Err(BillingError::Configuration(format!(
            "invalid base fee {base_fee}"
        )));
    }
    Ok(())
}
