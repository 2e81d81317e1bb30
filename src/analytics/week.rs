use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::types::CompletionSet;

/// Monday of the week containing `date`. Weeks always start on Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The seven days, Monday through Sunday, of one calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    days: [NaiveDate; 7],
}

impl WeekWindow {
    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.days[6]
    }
}

pub fn week_window(reference: NaiveDate) -> WeekWindow {
    let start = week_start(reference);
    WeekWindow {
        days: std::array::from_fn(|i| start + Duration::days(i as i64)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDayStatus {
    pub date: NaiveDate,
    pub completed: bool,
}

pub fn week_day_statuses(window: &WeekWindow, completions: &CompletionSet) -> [WeekDayStatus; 7] {
    window.days.map(|date| WeekDayStatus {
        date,
        completed: completions.contains(date),
    })
}
