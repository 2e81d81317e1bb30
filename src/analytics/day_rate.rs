//! Day-based completion rate over an explicit date range.
//!
//! Expected completions are the target frequency times the number of weeks
//! the range touches, rounded up. The result is capped at 100.

use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::error::AnalyticsError;
use super::types::{CompletionSet, TargetFrequency};

pub const DEFAULT_RATE_WINDOW_DAYS: i64 = 30;

/// Length in days of the trailing window the day-based rate looks at,
/// always in `1..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RateWindow(u16);

impl RateWindow {
    pub const MIN_DAYS: i64 = 1;
    /// Roughly ten years.
    pub const MAX_DAYS: i64 = 3660;
    pub const DEFAULT: RateWindow = RateWindow(DEFAULT_RATE_WINDOW_DAYS as u16);

    pub fn new(days: i64) -> Result<Self, AnalyticsError> {
        if (Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) {
            Ok(Self(days as u16))
        } else {
            Err(AnalyticsError::InvalidRateWindow(days))
        }
    }

    pub fn days(self) -> i64 {
        i64::from(self.0)
    }
}

impl Default for RateWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for RateWindow {
    type Error = AnalyticsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RateWindow> for i64 {
    fn from(value: RateWindow) -> Self {
        value.days()
    }
}

impl fmt::Display for RateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[end - days, end]`, both ends inclusive.
    ///
    /// Fails on a negative `days` or when the start would fall outside the
    /// representable calendar.
    pub fn trailing_days(end: NaiveDate, days: i64) -> Result<Self, AnalyticsError> {
        if days < 0 {
            return Err(AnalyticsError::InvalidRateWindow(days));
        }
        let start = TimeDelta::try_days(days)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(AnalyticsError::DateOutOfRange { end, days })?;
        Ok(Self::new(start, end))
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

pub fn day_completion_rate(
    completions: &CompletionSet,
    target: TargetFrequency,
    range: DateRange,
) -> f64 {
    let days = range.num_days();
    if days <= 0 {
        return 0.0;
    }

    let weeks = (days + 6) / 7;
    let expected = weeks as f64 * f64::from(target.get());
    let completed = completions.count_between(range.start, range.end) as f64;
    (completed / expected * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::parse_date;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn target(n: i64) -> TargetFrequency {
        TargetFrequency::new(n).unwrap()
    }

    #[test]
    fn default_window_spans_five_weeks() {
        let range = DateRange::trailing_days(date("2026-10-31"), DEFAULT_RATE_WINDOW_DAYS).unwrap();
        assert_eq!(range.start, date("2026-10-01"));
        assert_eq!(range.num_days(), 31);
    }

    #[test]
    fn rate_counts_only_days_inside_range() {
        let set = CompletionSet::parse(["2026-09-30", "2026-10-01", "2026-10-15", "2026-10-31", "2026-11-01"])
            .unwrap();
        let range = DateRange::trailing_days(date("2026-10-31"), DEFAULT_RATE_WINDOW_DAYS).unwrap();
        // 3 completions / (5 weeks * 2) = 30%
        let rate = day_completion_rate(&set, target(2), range);
        assert!((rate - 30.0).abs() < 1e-9);
    }

    #[test]
    fn rate_is_capped_at_one_hundred() {
        let end = date("2026-10-31");
        let set: CompletionSet = (0..31).map(|i| end - Duration::days(i)).collect();
        let rate = day_completion_rate(&set, target(1), DateRange::trailing_days(end, 30).unwrap());
        assert_eq!(rate, 100.0);
    }

    #[test]
    fn rate_stays_within_bounds() {
        let end = date("2026-10-31");
        for days in 0..40 {
            let set: CompletionSet = (0..days).map(|i| end - Duration::days(i)).collect();
            for t in 1..=7 {
                let rate = day_completion_rate(&set, target(t), DateRange::trailing_days(end, 30).unwrap());
                assert!((0.0..=100.0).contains(&rate), "rate {rate} out of bounds");
            }
        }
    }

    #[test]
    fn empty_set_and_inverted_range_are_zero() {
        let range = DateRange::trailing_days(date("2026-10-31"), 30).unwrap();
        assert_eq!(day_completion_rate(&CompletionSet::default(), target(3), range), 0.0);

        let set = CompletionSet::parse(["2026-10-15"]).unwrap();
        let inverted = DateRange::new(date("2026-10-31"), date("2026-10-01"));
        assert_eq!(day_completion_rate(&set, target(3), inverted), 0.0);
    }

    #[test]
    fn trailing_days_rejects_negative_and_unrepresentable_windows() {
        let end = date("2026-10-19");
        assert_eq!(
            DateRange::trailing_days(end, -1),
            Err(AnalyticsError::InvalidRateWindow(-1))
        );
        assert_eq!(
            DateRange::trailing_days(end, 1_000_000_000),
            Err(AnalyticsError::DateOutOfRange { end, days: 1_000_000_000 })
        );
        assert!(DateRange::trailing_days(end, i64::MAX).is_err());
        assert_eq!(DateRange::trailing_days(end, 0).unwrap().num_days(), 1);
    }

    #[test]
    fn rate_window_is_bounded() {
        assert_eq!(RateWindow::default().days(), 30);
        assert_eq!(RateWindow::new(3660).unwrap().days(), 3660);
        assert_eq!(RateWindow::new(0), Err(AnalyticsError::InvalidRateWindow(0)));
        assert_eq!(RateWindow::new(-5), Err(AnalyticsError::InvalidRateWindow(-5)));
        assert!(RateWindow::new(1_000_000_000).is_err());
    }
}
