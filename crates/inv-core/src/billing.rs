//! End-to-end billing of a timesheet.

use serde::Serialize;

use crate::aggregate::aggregate;
use crate::biller::Biller;
use crate::error::BillingError;
use crate::frequency::Frequency;
use crate::summary::{CostSummaryRow, summarize};
use crate::timesheet::{DateRange, Timesheet};

/// Options for a single invoicing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BillingOptions {
    /// Only bill entries inside this range.
    pub date_range: DateRange,

    /// Bill each project separately.
    pub by_project: bool,

    /// Overrides the biller's own frequency.
    pub frequency: Option<Frequency>,
}

/// Aggregates `timesheet` into periods and breaks each period's cost down by tier.
///
/// The period cadence is `options.frequency` if set, otherwise the biller's
/// frequency, otherwise one period spanning the billed entries.
pub fn bill(
    timesheet: &Timesheet,
    biller: &Biller,
    options: &BillingOptions,
) -> Result<Vec<CostSummaryRow>, BillingError> {
    let frequency = options.frequency.or_else(|| biller.frequency());
    tracing::debug!(
        biller = biller.name().unwrap_or("(unnamed)"),
        ?frequency,
        by_project = options.by_project,
        "billing timesheet"
    );

    let totals = aggregate(timesheet, &options.date_range, frequency, options.by_project);
    summarize(&totals, biller)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::summary::invoice_total;
    use crate::timesheet::TimeEntry;
    use crate::types::ProjectId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timesheet() -> Timesheet {
        // Two weeks of work starting Monday Apr 11, 2016
        (0..10)
            .map(|d| {
                let project = if d % 2 == 0 { "acme" } else { "globex" };
                TimeEntry::new(
                    date(2016, 4, 11) + chrono::Days::new(d),
                    ProjectId::new(project).unwrap(),
                    3.0,
                )
                .unwrap()
            })
            .collect()
    }

    fn weekly_biller() -> Biller {
        Biller::new(vec![10.0, f64::INFINITY], vec![100.0, 80.0])
            .unwrap()
            .with_base_fee(50.0)
            .unwrap()
            .with_frequency(Frequency::weekly())
    }

    #[test]
    fn uses_biller_frequency_by_default() {
        let rows = bill(&timesheet(), &weekly_biller(), &BillingOptions::default()).unwrap();

        // Week 1: 7 days x 3h = 21h; week 2: 3 days x 3h = 9h
        let week_starts: Vec<_> = rows.iter().map(|r| r.start_date).collect();
        assert_eq!(
            week_starts,
            vec![
                date(2016, 4, 11),
                date(2016, 4, 11),
                date(2016, 4, 11),
                date(2016, 4, 18),
                date(2016, 4, 18),
            ]
        );
        let expected = (50.0 + 1000.0 + 11.0 * 80.0) + (50.0 + 900.0);
        assert!((invoice_total(&rows) - expected).abs() < 1e-9);
    }

    #[test]
    fn option_frequency_overrides_biller() {
        let options = BillingOptions {
            frequency: Some(Frequency::monthly()),
            ..BillingOptions::default()
        };
        let rows = bill(&timesheet(), &weekly_biller(), &options).unwrap();

        // One April period: 30h
        assert!(rows.iter().all(|r| r.start_date == date(2016, 4, 1)));
        let expected = 50.0 + 1000.0 + 20.0 * 80.0;
        assert!((invoice_total(&rows) - expected).abs() < 1e-9);
    }

    #[test]
    fn by_project_bills_each_project_separately() {
        let options = BillingOptions {
            by_project: true,
            ..BillingOptions::default()
        };
        let biller = Biller::new(vec![10.0, f64::INFINITY], vec![100.0, 80.0]).unwrap();
        let rows = bill(&timesheet(), &biller, &options).unwrap();

        // Each project has 15h: 10h at 100 and 5h at 80
        assert_eq!(rows.len(), 4);
        assert!((invoice_total(&rows) - 2.0 * (1000.0 + 400.0)).abs() < 1e-9);
    }

    #[test]
    fn by_project_charges_base_fee_for_idle_weeks() {
        // globex only works in the first week, acme in both
        let timesheet = Timesheet::new(vec![
            TimeEntry::new(date(2016, 4, 11), ProjectId::new("acme").unwrap(), 2.0).unwrap(),
            TimeEntry::new(date(2016, 4, 12), ProjectId::new("globex").unwrap(), 1.0).unwrap(),
            TimeEntry::new(date(2016, 4, 19), ProjectId::new("acme").unwrap(), 3.0).unwrap(),
        ]);
        let options = BillingOptions {
            by_project: true,
            ..BillingOptions::default()
        };
        let rows = bill(&timesheet, &weekly_biller(), &options).unwrap();

        let globex_week_two: Vec<_> = rows
            .iter()
            .filter(|r| r.start_date == date(2016, 4, 18))
            .filter(|r| r.project.as_ref().is_some_and(|p| p.as_str() == "globex"))
            .collect();
        assert_eq!(globex_week_two.len(), 1);
        assert!(globex_week_two[0].is_base_fee());
        assert!((globex_week_two[0].cost - 50.0).abs() < 1e-9);

        // Four project-weeks at 50 each, plus 6h at 100
        assert!((invoice_total(&rows) - (4.0 * 50.0 + 600.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_range_bills_nothing() {
        let options = BillingOptions {
            date_range: DateRange::new(Some(date(2020, 1, 1)), None).unwrap(),
            ..BillingOptions::default()
        };
        let rows = bill(&timesheet(), &weekly_biller(), &options).unwrap();
        assert!(rows.is_empty());
    }
}
