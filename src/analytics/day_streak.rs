//! Consecutive-day streaks.
//!
//! The current streak is anchored at "today" with one day of grace: a habit
//! that has not been done yet today keeps its streak as long as yesterday was
//! completed.

use chrono::NaiveDate;

use super::types::{CompletionSet, StreakMetrics};
use super::week::WeekDayStatus;

pub fn day_streak(completions: &CompletionSet, today: NaiveDate) -> StreakMetrics {
    StreakMetrics::new(
        current_day_streak(completions, today),
        longest_day_streak(completions),
    )
}

/// Day streak over only the completed days of a week view.
pub fn day_streak_from_week(week: &[WeekDayStatus], today: NaiveDate) -> StreakMetrics {
    let completed: CompletionSet = week
        .iter()
        .filter(|day| day.completed)
        .map(|day| day.date)
        .collect();
    day_streak(&completed, today)
}

fn current_day_streak(completions: &CompletionSet, today: NaiveDate) -> u32 {
    let anchor = if completions.contains(today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if completions.contains(yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 1;
    let mut cursor = anchor;
    while let Some(previous) = cursor.pred_opt() {
        if !completions.contains(previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

fn longest_day_streak(completions: &CompletionSet) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in completions.iter() {
        run = match previous {
            Some(p) if p.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}
