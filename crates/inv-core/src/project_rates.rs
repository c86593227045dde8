//! Billing each project at its own flat hourly rate.

use std::collections::HashMap;

use crate::aggregate::aggregate;
use crate::biller::Biller;
use crate::error::BillingError;
use crate::summary::{CostSummaryRow, summarize};
use crate::timesheet::{DateRange, Timesheet};
use crate::types::ProjectId;

/// Sums time per project over `range` and bills it at that project's rate.
///
/// Produces one row per project with time logged, ordered by project. Every
/// project with time in range must have a rate: missing rates are an error
/// rather than a silently dropped line.
pub fn bill_at_project_rates(
    timesheet: &Timesheet,
    rates: &HashMap<ProjectId, f64>,
    range: &DateRange,
) -> Result<Vec<CostSummaryRow>, BillingError> {
    let totals = aggregate(timesheet, range, None, true);

    let mut rows = Vec::with_capacity(totals.len());
    for total in totals {
        let Some(project) = total.period.project.as_ref() else {
            continue;
        };
        let rate = rates
            .get(project)
            .copied()
            .ok_or_else(|| BillingError::MissingProjectRate(project.clone()))?;
        let biller = Biller::flat(rate)?;
        rows.extend(summarize(std::slice::from_ref(&total), &biller)?);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::summary::invoice_total;
    use crate::timesheet::TimeEntry;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 4, d).unwrap()
    }

    fn project(name: &str) -> ProjectId {
        ProjectId::new(name).unwrap()
    }

    fn timesheet() -> Timesheet {
        Timesheet::new(vec![
            TimeEntry::new(date(1), project("acme"), 2.0).unwrap(),
            TimeEntry::new(date(2), project("globex"), 4.0).unwrap(),
            TimeEntry::new(date(5), project("acme"), 1.0).unwrap(),
        ])
    }

    fn rates() -> HashMap<ProjectId, f64> {
        HashMap::from([(project("acme"), 100.0), (project("globex"), 50.0)])
    }

    #[test]
    fn bills_each_project_at_its_rate() {
        let rows = bill_at_project_rates(&timesheet(), &rates(), &DateRange::unbounded()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project, Some(project("acme")));
        assert!((rows[0].time_spent - 3.0).abs() < f64::EPSILON);
        assert_eq!(rows[0].rate, Some(100.0));
        assert!((rows[0].cost - 300.0).abs() < 1e-9);
        assert!((rows[1].cost - 200.0).abs() < 1e-9);
        assert!((invoice_total(&rows) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn respects_date_range() {
        let range = DateRange::new(Some(date(2)), None).unwrap();
        let rows = bill_at_project_rates(&timesheet(), &rates(), &range).unwrap();

        let billed: Vec<_> = rows.iter().map(|r| (r.project.clone(), r.cost)).collect();
        assert_eq!(
            billed,
            vec![(Some(project("acme")), 100.0), (Some(project("globex")), 200.0)]
        );
    }

    #[test]
    fn missing_rate_is_an_error() {
        let rates = HashMap::from([(project("acme"), 100.0)]);
        let err = bill_at_project_rates(&timesheet(), &rates, &DateRange::unbounded()).unwrap_err();
        assert_eq!(err, BillingError::MissingProjectRate(project("globex")));
    }

    #[test]
    fn negative_rate_is_a_configuration_error() {
        let mut rates = rates();
        rates.insert(project("globex"), -5.0);
        let err = bill_at_project_rates(&timesheet(), &rates, &DateRange::unbounded()).unwrap_err();
        assert!(matches!(err, BillingError::Configuration(_)));
    }

    #[test]
    fn unused_rates_are_ignored() {
        let mut rates = rates();
        rates.insert(project("initech"), 75.0);
        let rows = bill_at_project_rates(&timesheet(), &rates, &DateRange::unbounded()).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
