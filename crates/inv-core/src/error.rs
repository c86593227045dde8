//! Billing engine errors.

use thiserror::Error;

use crate::frequency::UnknownFrequency;
use crate::types::{ProjectId, ValidationError};

/// Errors produced by the billing engine.
///
/// Every stage is a pure function, so an error never leaves partial state
/// behind and retrying the same input yields the same error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BillingError {
    /// A biller or billing option was rejected at construction time.
    #[error("invalid billing configuration: {0}")]
    Configuration(String),

    /// The quantity to decompose does not fit in the tiers.
    #[error("{quantity} hours exceeds the total tier capacity of {capacity} hours")]
    CapacityExceeded { quantity: f64, capacity: f64 },

    /// Decomposition was asked to split a negative or NaN quantity.
    #[error("cannot bill a negative quantity of time: {0}")]
    NegativeQuantity(f64),

    /// Project-rate billing found time for a project with no rate.
    #[error("no rate configured for project {0}")]
    MissingProjectRate(ProjectId),

    /// Timesheet data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<UnknownFrequency> for BillingError {
    fn from(err: UnknownFrequency) -> Self {
        Self::Configuration(err.to_string())
    }
}
