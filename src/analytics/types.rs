use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::AnalyticsError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| AnalyticsError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ─── Target frequency ───────────────────────────────────────────────────────

/// Days per week a habit is expected to be completed, always in `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TargetFrequency(u8);

impl TargetFrequency {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;
    pub const DAILY: TargetFrequency = TargetFrequency(7);

    pub fn new(value: i64) -> Result<Self, AnalyticsError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AnalyticsError::InvalidTargetFrequency(value))
        }
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for TargetFrequency {
    fn default() -> Self {
        Self::DAILY
    }
}

impl TryFrom<u8> for TargetFrequency {
    type Error = AnalyticsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<TargetFrequency> for u8 {
    fn from(value: TargetFrequency) -> Self {
        value.0
    }
}

impl fmt::Display for TargetFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Completion set ─────────────────────────────────────────────────────────

/// Immutable snapshot of the days one habit was completed.
///
/// Backed by an ordered set, so iteration is always ascending and a date can
/// never be counted twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    dates: BTreeSet<NaiveDate>,
}

impl CompletionSet {
    /// Build a set from raw `YYYY-MM-DD` strings as handed over by storage.
    pub fn parse<I, S>(raw: I) -> Result<Self, AnalyticsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|s| parse_date(s.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|dates| Self { dates })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Number of completions in `start..=end`.
    pub fn count_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        if start > end {
            return 0;
        }
        self.dates.range(start..=end).count()
    }
}

impl FromIterator<NaiveDate> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

// ─── Streak metrics ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakMetrics {
    pub current_streak: u32,
    pub best_streak: u32,
    pub longest_streak: u32,
}

impl StreakMetrics {
    pub fn new(current_streak: u32, longest_streak: u32) -> Self {
        Self {
            current_streak,
            best_streak: current_streak.max(longest_streak),
            longest_streak,
        }
    }
}
