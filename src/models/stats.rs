use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{
    completion_rate, day_completion_rate, week_bucket_streaks, AnalyticsError, CompletionSet,
    DateRange, RateWindow, TargetFrequency, WeekDayStatus,
};
use crate::models::Habit;

/// `{ "week": [{ "date", "completed" }] }`
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub week: Vec<WeekDayStatus>,
}

impl WeekView {
    pub fn completed_days(&self) -> usize {
        self.week.iter().filter(|d| d.completed).count()
    }
}

/// Per-habit summary built on week-bucketed streaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatistics {
    pub habit_id: i64,
    pub habit_name: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub completion_rate: u32,
    pub day_completion_rate: f64,
    pub total_completions: usize,
    pub target_frequency: TargetFrequency,
}

impl HabitStatistics {
    pub fn from_completions(
        habit: &Habit,
        completions: &CompletionSet,
        trailing_weeks: usize,
        rate_window: RateWindow,
        today: NaiveDate,
    ) -> Result<Self, AnalyticsError> {
        let target = habit.target_frequency;
        let streaks = week_bucket_streaks(completions, target, today);
        let rate_range = DateRange::trailing_days(today, rate_window.days())?;
        Ok(Self {
            habit_id: habit.id,
            habit_name: habit.name.clone(),
            current_streak: streaks.current_streak,
            best_streak: streaks.longest_streak,
            completion_rate: completion_rate(completions, target, trailing_weeks, today),
            day_completion_rate: day_completion_rate(completions, target, rate_range),
            total_completions: completions.len(),
            target_frequency: target,
        })
    }
}

/// Totals across every habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitOverview {
    pub total_habits: usize,
    /// Sum of every habit's target frequency.
    pub weekly_target_days: u32,
    /// `0.0` when there are no habits.
    pub average_target_frequency: f64,
}

impl HabitOverview {
    pub fn from_habits(habits: &[Habit]) -> Self {
        let total_habits = habits.len();
        let weekly_target_days: u32 = habits.iter().map(|h| h.target_frequency.get()).sum();
        let average_target_frequency = if total_habits == 0 {
            0.0
        } else {
            f64::from(weekly_target_days) / total_habits as f64
        };
        Self {
            total_habits,
            weekly_target_days,
            average_target_frequency,
        }
    }
}

/// `{ "statistics": { ... } }`
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub statistics: HabitStatistics,
}
