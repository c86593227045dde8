//! Billing cadences and the calendar periods they produce.
//!
//! Tokens follow the pandas offset aliases the timesheets were originally
//! resampled with: an optional multiplier followed by a unit, e.g. `W`,
//! `2W`, `monthly`. Weeks run Monday through Sunday; months, quarters and
//! years are calendar aligned.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pre-compiled pattern for `[count]unit` tokens.
static FREQUENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d*)\s*([A-Za-z][A-Za-z-]*)\s*$").unwrap());

/// Calendar unit a [`Frequency`] counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl FrequencyUnit {
    /// Canonical single-letter alias.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
            Self::Quarter => "Q",
            Self::Year => "Y",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "d" | "day" | "days" | "daily" => Some(Self::Day),
            "w" | "w-sun" | "week" | "weeks" | "weekly" => Some(Self::Week),
            "m" | "month" | "months" | "monthly" => Some(Self::Month),
            "q" | "quarter" | "quarters" | "quarterly" => Some(Self::Quarter),
            "y" | "a" | "year" | "years" | "yearly" | "annual" | "annually" => Some(Self::Year),
            _ => None,
        }
    }

    /// First day of the unit period containing `date`.
    fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Days::new(u64::from(date.weekday().num_days_from_monday())),
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Quarter => {
                let month0 = date.month0() / 3 * 3;
                NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1).unwrap_or(date)
            }
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Moves an aligned period start forward by `count` units.
    ///
    /// Saturates at the end of the representable calendar.
    fn advance(self, start: NaiveDate, count: u32) -> NaiveDate {
        let next = match self {
            Self::Day => start.checked_add_days(Days::new(u64::from(count))),
            Self::Week => start.checked_add_days(Days::new(7 * u64::from(count))),
            Self::Month => start.checked_add_months(Months::new(count)),
            Self::Quarter => start.checked_add_months(Months::new(count.saturating_mul(3))),
            Self::Year => start.checked_add_months(Months::new(count.saturating_mul(12))),
        };
        next.unwrap_or(NaiveDate::MAX)
    }

    /// Whole units from the aligned start `from` to the unit containing `to`.
    fn units_between(self, from: NaiveDate, to: NaiveDate) -> u32 {
        let months = || {
            (i64::from(to.year()) - i64::from(from.year())) * 12 + i64::from(to.month0())
                - i64::from(from.month0())
        };
        let units = match self {
            Self::Day => (to - from).num_days(),
            Self::Week => (to - from).num_days() / 7,
            Self::Month => months(),
            Self::Quarter => months() / 3,
            Self::Year => months() / 12,
        };
        u32::try_from(units.max(0)).unwrap_or(u32::MAX)
    }
}

/// A billing cadence: `count` consecutive calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frequency {
    count: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    /// Creates a cadence of `count` units. `count` must be positive.
    pub fn new(count: u32, unit: FrequencyUnit) -> Result<Self, UnknownFrequency> {
        if count == 0 {
            return Err(UnknownFrequency(format!("0{}", unit.as_str())));
        }
        Ok(Self { count, unit })
    }

    pub const fn daily() -> Self {
        Self {
            count: 1,
            unit: FrequencyUnit::Day,
        }
    }

    pub const fn weekly() -> Self {
        Self {
            count: 1,
            unit: FrequencyUnit::Week,
        }
    }

    pub const fn monthly() -> Self {
        Self {
            count: 1,
            unit: FrequencyUnit::Month,
        }
    }

    pub const fn count(self) -> u32 {
        self.count
    }

    pub const fn unit(self) -> FrequencyUnit {
        self.unit
    }

    /// The period `[start, end]` of `count` units that starts at the unit
    /// boundary containing `date`.
    ///
    /// This is the first window of [`Frequency::periods`] for a range starting
    /// at `date`. Use [`Frequency::enclosing_from`] to find a later window of a
    /// series anchored elsewhere.
    pub fn enclosing(self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        self.window_at(self.unit.start_of(date))
    }

    /// The window of `self.periods(anchor, ..)` that contains `date`.
    ///
    /// Returns `None` when `date` falls before the unit boundary enclosing
    /// `anchor`.
    pub fn enclosing_from(
        self,
        anchor: NaiveDate,
        date: NaiveDate,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let origin = self.unit.start_of(anchor);
        if date < origin {
            return None;
        }
        let skipped = self.unit.units_between(origin, date) / self.count * self.count;
        Some(self.window_at(self.unit.advance(origin, skipped)))
    }

    fn window_at(self, start: NaiveDate) -> (NaiveDate, NaiveDate) {
        let next = self.unit.advance(start, self.count);
        if next <= start {
            return (start, start);
        }
        (start, next.pred_opt().unwrap_or(next))
    }

    /// Contiguous, non-overlapping periods covering `[start, end]` in order.
    ///
    /// The first period begins at the unit boundary enclosing `start`, and each
    /// period spans `count` units, so the last one may extend past `end`.
    pub fn periods(self, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
        let mut periods = Vec::new();
        let mut current = self.unit.start_of(start);
        while current <= end {
            let window = self.window_at(current);
            periods.push(window);
            match window.1.succ_opt() {
                Some(next) if next > current => current = next,
                _ => break,
            }
        }
        periods
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}", self.unit.as_str())
        } else {
            write!(f, "{}{}", self.count, self.unit.as_str())
        }
    }
}

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownFrequency(s.to_string());
        let caps = FREQUENCY_RE.captures(s).ok_or_else(unknown)?;
        let count = match &caps[1] {
            "" => 1,
            digits => digits.parse().map_err(|_| unknown())?,
        };
        let unit = FrequencyUnit::parse(&caps[2]).ok_or_else(unknown)?;
        Self::new(count, unit).map_err(|_| unknown())
    }
}

impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unrecognized frequency tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown frequency: {0:?} (expected e.g. D, W, 2W, M, Q, Y)")]
pub struct UnknownFrequency(String);

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_aliases_and_multipliers() {
        assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::weekly());
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::weekly());
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::monthly());
        assert_eq!("d".parse::<Frequency>().unwrap(), Frequency::daily());

        let fortnightly: Frequency = "2W".parse().unwrap();
        assert_eq!(fortnightly.count(), 2);
        assert_eq!(fortnightly.unit(), FrequencyUnit::Week);

        let annual: Frequency = "A".parse().unwrap();
        assert_eq!(annual.unit(), FrequencyUnit::Year);
    }

    #[test]
    fn unknown_tokens_error() {
        for token in ["", "fortnight", "0W", "W2", "-1W"] {
            let result: Result<Frequency, _> = token.parse();
            assert!(result.is_err(), "{token:?} should not parse");
        }

        let err = "hourly".parse::<Frequency>().unwrap_err();
        assert!(err.to_string().starts_with("unknown frequency: \"hourly\""));
    }

    #[test]
    fn display_roundtrip() {
        for token in ["D", "W", "2W", "M", "3M", "Q", "Y"] {
            let parsed: Frequency = token.parse().unwrap();
            assert_eq!(parsed.to_string(), token);
        }
    }

    #[test]
    fn serde_uses_token_strings() {
        let json = serde_json::to_string(&Frequency::weekly()).unwrap();
        assert_eq!(json, "\"W\"");
        let parsed: Frequency = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(parsed, Frequency::monthly());
        assert!(serde_json::from_str::<Frequency>("\"never\"").is_err());
    }

    #[test]
    fn week_encloses_monday_to_sunday() {
        // Apr 13, 2016 is a Wednesday
        let (start, end) = Frequency::weekly().enclosing(date(2016, 4, 13));
        assert_eq!(start, date(2016, 4, 11));
        assert_eq!(end, date(2016, 4, 17));

        // Sunday belongs to the week that started the previous Monday
        let (start, end) = Frequency::weekly().enclosing(date(2016, 4, 17));
        assert_eq!(start, date(2016, 4, 11));
        assert_eq!(end, date(2016, 4, 17));
    }

    #[test]
    fn multiplied_cadence_encloses_count_units() {
        let fortnightly: Frequency = "2W".parse().unwrap();
        let window = fortnightly.enclosing(date(2016, 4, 13));
        assert_eq!(window, (date(2016, 4, 11), date(2016, 4, 24)));
        assert!(
            fortnightly
                .periods(date(2016, 4, 11), date(2016, 4, 24))
                .contains(&window)
        );

        let three_months: Frequency = "3M".parse().unwrap();
        assert_eq!(
            three_months.enclosing(date(2016, 2, 10)),
            (date(2016, 2, 1), date(2016, 4, 30))
        );
    }

    #[test]
    fn enclosing_from_matches_anchored_periods() {
        let fortnightly: Frequency = "2W".parse().unwrap();
        let anchor = date(2016, 4, 13);
        let periods = fortnightly.periods(anchor, date(2016, 6, 1));

        let mut day = anchor;
        while day <= date(2016, 6, 1) {
            let window = fortnightly.enclosing_from(anchor, day).unwrap();
            assert!(periods.contains(&window), "{day} -> {window:?}");
            assert!(window.0 <= day && day <= window.1);
            day = day.succ_opt().unwrap();
        }

        let three_months: Frequency = "3M".parse().unwrap();
        assert_eq!(
            three_months.enclosing_from(date(2016, 1, 15), date(2016, 8, 10)),
            Some((date(2016, 7, 1), date(2016, 9, 30)))
        );
        assert_eq!(three_months.enclosing_from(date(2016, 1, 15), date(2015, 12, 31)), None);
    }

    #[test]
    fn month_quarter_and_year_are_calendar_aligned() {
        assert_eq!(
            Frequency::monthly().enclosing(date(2016, 2, 10)),
            (date(2016, 2, 1), date(2016, 2, 29))
        );

        let quarterly: Frequency = "Q".parse().unwrap();
        assert_eq!(
            quarterly.enclosing(date(2016, 5, 20)),
            (date(2016, 4, 1), date(2016, 6, 30))
        );

        let yearly: Frequency = "Y".parse().unwrap();
        assert_eq!(
            yearly.enclosing(date(2016, 5, 20)),
            (date(2016, 1, 1), date(2016, 12, 31))
        );
    }

    #[test]
    fn periods_cover_range_contiguously() {
        let periods = Frequency::weekly().periods(date(2016, 4, 13), date(2016, 4, 26));
        assert_eq!(
            periods,
            vec![
                (date(2016, 4, 11), date(2016, 4, 17)),
                (date(2016, 4, 18), date(2016, 4, 24)),
                (date(2016, 4, 25), date(2016, 5, 1)),
            ]
        );
    }

    #[test]
    fn periods_group_multiple_units() {
        let fortnightly: Frequency = "2W".parse().unwrap();
        let periods = fortnightly.periods(date(2016, 4, 11), date(2016, 5, 1));
        assert_eq!(
            periods,
            vec![
                (date(2016, 4, 11), date(2016, 4, 24)),
                (date(2016, 4, 25), date(2016, 5, 8)),
            ]
        );
    }

    #[test]
    fn periods_for_a_single_day() {
        let periods = Frequency::daily().periods(date(2016, 4, 11), date(2016, 4, 11));
        assert_eq!(periods, vec![(date(2016, 4, 11), date(2016, 4, 11))]);
    }

    #[test]
    fn monthly_periods_span_year_boundary() {
        let periods = Frequency::monthly().periods(date(2015, 12, 15), date(2016, 1, 3));
        assert_eq!(
            periods,
            vec![
                (date(2015, 12, 1), date(2015, 12, 31)),
                (date(2016, 1, 1), date(2016, 1, 31)),
            ]
        );
    }
}
