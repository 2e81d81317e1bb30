//! Week-bucketed streaks and completion rate.
//!
//! Completions are grouped into Monday-start weeks and each week is compared
//! against the habit's target frequency. Unlike the day streak there is no
//! grace period: a week that is short of the target, the in-progress week
//! included, ends the current streak.
//!
//! The longest streak walks calendar weeks too, so a skipped week with no
//! completions at all resets the run. It does not only compare the weeks that
//! happen to have data.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::types::{CompletionSet, TargetFrequency};
use super::week::week_start;

pub const DEFAULT_TRAILING_WEEKS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub count: u32,
}

impl WeekBucket {
    pub fn qualifies(&self, target: TargetFrequency) -> bool {
        self.count >= target.get()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStreaks {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Completion counts per week, ascending by week start. Weeks without any
/// completion are absent.
pub fn week_buckets(completions: &CompletionSet) -> Vec<WeekBucket> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for date in completions.iter() {
        *counts.entry(week_start(date)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(week_start, count)| WeekBucket { week_start, count })
        .collect()
}

pub fn week_bucket_streaks(
    completions: &CompletionSet,
    target: TargetFrequency,
    now: NaiveDate,
) -> WeekStreaks {
    let buckets = week_buckets(completions);
    WeekStreaks {
        current_streak: current_week_streak(&buckets, target, week_start(now)),
        longest_streak: longest_week_streak(&buckets, target),
    }
}

/// Percentage of the target reached over the `trailing_weeks` most recent
/// weeks with data, up to and including the current one. Not capped at 100.
pub fn completion_rate(
    completions: &CompletionSet,
    target: TargetFrequency,
    trailing_weeks: usize,
    now: NaiveDate,
) -> u32 {
    let current_week = week_start(now);
    let buckets = week_buckets(completions);
    let included: Vec<&WeekBucket> = buckets
        .iter()
        .rev()
        .filter(|b| b.week_start <= current_week)
        .take(trailing_weeks)
        .collect();

    if included.is_empty() {
        return 0;
    }

    let total: u32 = included.iter().map(|b| b.count).sum();
    let expected = target.get() * included.len() as u32;
    (f64::from(total) / f64::from(expected) * 100.0).round() as u32
}

fn current_week_streak(buckets: &[WeekBucket], target: TargetFrequency, current_week: NaiveDate) -> u32 {
    let mut expected = current_week;
    let mut streak = 0;

    for bucket in buckets.iter().rev().filter(|b| b.week_start <= current_week) {
        // A missing bucket is an empty week and breaks the streak.
        if bucket.week_start != expected || !bucket.qualifies(target) {
            break;
        }
        streak += 1;
        expected = expected - Duration::weeks(1);
    }
    streak
}

fn longest_week_streak(buckets: &[WeekBucket], target: TargetFrequency) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for bucket in buckets {
        let adjacent = previous.is_some_and(|p| p + Duration::weeks(1) == bucket.week_start);
        run = if !bucket.qualifies(target) {
            0
        } else if adjacent {
            run + 1
        } else {
            1
        };
        longest = longest.max(run);
        previous = Some(bucket.week_start);
    }
    longest
}
