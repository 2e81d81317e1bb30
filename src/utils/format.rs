use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUnit {
    Day,
    Week,
}

/// "No streak", "1 day", "5 weeks"
pub fn format_streak_count(count: u32, unit: StreakUnit) -> String {
    let noun = match unit {
        StreakUnit::Day => "day",
        StreakUnit::Week => "week",
    };
    match count {
        0 => "No streak".to_string(),
        1 => format!("1 {}", noun),
        n => format!("{} {}s", n, noun),
    }
}

/// Format a percentage without decimals, e.g. "67%"
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

/// "Mon 19 Oct"
pub fn format_day(date: NaiveDate) -> String {
    format!("{} {:>2} {}", date.weekday(), date.day(), date.format("%b"))
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
