//! Per-tier cost breakdown of aggregated periods.
//!
//! Costs are recovered by differencing the cost function at cumulative tier
//! checkpoints rather than multiplying hours by rates, so the per-tier costs
//! of a period always add back up to the cost function's value on the
//! period total.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::PeriodTotal;
use crate::biller::CostFunction;
use crate::decompose::decompose;
use crate::error::BillingError;
use crate::types::ProjectId;

/// One line of the cost summary: the time, effective rate, and cost of a
/// single tier in a single period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummaryRow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,

    /// Index into the biller's tiers. `None` marks the base fee row.
    pub tier_index: Option<usize>,

    /// Hours billed in this tier.
    pub time_spent: f64,

    /// Effective hourly rate. `None` for the base fee, which has no hours.
    pub rate: Option<f64>,

    pub cost: f64,
}

impl CostSummaryRow {
    pub const fn is_base_fee(&self) -> bool {
        self.tier_index.is_none()
    }
}

/// Hours and cost summed per project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTotal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    pub time_spent: f64,
    pub cost: f64,
}

/// Breaks each period's cost down by tier.
///
/// When the cost function has a non-zero base fee, a zero-width tier is put
/// in front of its tiers so the fee is reported on its own row. Tiers that
/// receive no hours are left out, except for that base fee row.
///
/// Periods are summarized in parallel; rows come back ordered by start date,
/// project, then tier.
pub fn summarize<B>(totals: &[PeriodTotal], biller: &B) -> Result<Vec<CostSummaryRow>, BillingError>
where
    B: CostFunction + ?Sized,
{
    let per_period: Vec<Vec<CostSummaryRow>> = totals
        .par_iter()
        .map(|total| summarize_period(total, biller))
        .collect::<Result<_, _>>()?;

    let mut rows: Vec<CostSummaryRow> = per_period.into_iter().flatten().collect();
    rows.sort_by(|a, b| {
        (a.start_date, &a.project, a.tier_index).cmp(&(b.start_date, &b.project, b.tier_index))
    });

    tracing::debug!(periods = totals.len(), rows = rows.len(), "summarized costs");
    Ok(rows)
}

fn summarize_period<B>(total: &PeriodTotal, biller: &B) -> Result<Vec<CostSummaryRow>, BillingError>
where
    B: CostFunction + ?Sized,
{
    let has_base_fee = biller.base_fee() != 0.0;
    let mut bins = Vec::with_capacity(biller.bins().len() + 1);
    if has_base_fee {
        bins.push(0.0);
    }
    bins.extend_from_slice(biller.bins());

    let parts = decompose(total.time_spent, &bins)?;

    let mut rows = Vec::new();
    let mut elapsed = 0.0;
    let mut previous = 0.0;
    for (i, &part) in parts.iter().enumerate() {
        elapsed += part;
        // Snap to the period total so the last checkpoint is exactly biller(total)
        let checkpoint = if elapsed >= total.time_spent {
            total.time_spent
        } else {
            elapsed
        };
        let cumulative = biller.cost(checkpoint)?;
        let cost = cumulative - previous;
        previous = cumulative;

        let tier_index = if has_base_fee { i.checked_sub(1) } else { Some(i) };
        let rate = if part > 0.0 {
            Some(cost / part)
        } else if tier_index.is_none() {
            None
        } else {
            continue;
        };

        rows.push(CostSummaryRow {
            start_date: total.period.start_date,
            end_date: total.period.end_date,
            project: total.period.project.clone(),
            tier_index,
            time_spent: part,
            rate,
            cost,
        });
    }

    tracing::trace!(
        start = %total.period.start_date,
        project = ?total.period.project,
        hours = total.time_spent,
        cost = previous,
        "summarized period"
    );
    Ok(rows)
}

/// Sum of every row's cost.
pub fn invoice_total(rows: &[CostSummaryRow]) -> f64 {
    rows.iter().map(|r| r.cost).sum()
}

/// Hours and cost per project, ordered by project.
///
/// Rows without a project are grouped under a single `None` entry.
pub fn totals_by_project(rows: &[CostSummaryRow]) -> Vec<ProjectTotal> {
    let mut grouped: BTreeMap<Option<&ProjectId>, (f64, f64)> = BTreeMap::new();
    for row in rows {
        let (time, cost) = grouped.entry(row.project.as_ref()).or_insert((0.0, 0.0));
        *time += row.time_spent;
        *cost += row.cost;
    }

    grouped
        .into_iter()
        .map(|(project, (time_spent, cost))| ProjectTotal {
            project: project.cloned(),
            time_spent,
            cost,
        })
        .collect()
}
