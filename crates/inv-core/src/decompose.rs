//! Splitting a quantity of time across ordered rate tiers.

use crate::error::BillingError;

/// Splits `quantity` across `bins`, filling each tier before moving to the next.
///
/// Each bin is the *width* of its tier, not a cumulative cutoff. The last bin
/// may be `f64::INFINITY` to absorb any remainder. The result always has one
/// element per bin, with zeros for tiers that receive nothing.
///
/// # Errors
///
/// Returns [`BillingError::NegativeQuantity`] for a negative or NaN quantity and
/// [`BillingError::CapacityExceeded`] when `quantity` is larger than the sum of
/// the bins. The quantity is never clamped.
pub fn decompose(quantity: f64, bins: &[f64]) -> Result<Vec<f64>, BillingError> {
    if quantity.is_nan() || quantity < 0.0 {
        return Err(BillingError::NegativeQuantity(quantity));
    }

    let capacity = capacity(bins);
    if quantity > capacity {
        return Err(BillingError::CapacityExceeded { quantity, capacity });
    }

    let mut remaining = quantity;
    let parts = bins
        .iter()
        .map(|&width| {
            if remaining >= width {
                remaining -= width;
                width
            } else if remaining > 0.0 {
                let part = remaining;
                remaining = 0.0;
                part
            } else {
                0.0
            }
        })
        .collect();

    Ok(parts)
}

/// Total width of all tiers. Infinite if any tier is unbounded.
pub fn capacity(bins: &[f64]) -> f64 {
    bins.iter().sum()
}
