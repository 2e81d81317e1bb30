use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;

use crate::analytics::{
    day_streak, day_streak_from_week, format_date, parse_date, week_day_statuses, week_window,
};
use crate::config::AppConfig;
use crate::db::repository::{CompletionRepo, HabitRepo};
use crate::models::{
    HabitOverview, HabitStatistics, HabitUpdate, NewHabit, StatisticsReport, WeekView,
};
use crate::utils::format::{
    format_day, format_percent, format_streak_count, progress_bar, StreakUnit,
};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";

// ─── Habits ──────────────────────────────────────────────────────────────────

pub fn handle_add(
    conn: &Connection,
    config: &AppConfig,
    name: &str,
    description: Option<&str>,
    target: Option<i64>,
) -> Result<()> {
    let new_habit = NewHabit::validate(
        name,
        description,
        target,
        config.habits.default_target_frequency,
    )?;
    let habit = HabitRepo::create(conn, &new_habit)?;
    info!("habit {} created", habit.id);
    println_colored!(
        GREEN,
        "  ✓ Created '{}' (#{}, {} days/week)",
        habit.name,
        habit.id,
        habit.target_frequency
    );
    Ok(())
}

pub fn handle_edit(
    conn: &Connection,
    key: &str,
    name: Option<&str>,
    description: Option<&str>,
    target: Option<i64>,
) -> Result<()> {
    let update = HabitUpdate::validate(name, description, target)?;
    if update.is_empty() {
        bail!("Nothing to change. Pass --name, --description or --target");
    }

    let mut habit = HabitRepo::resolve(conn, key)?;
    update.apply(&mut habit);
    let habit = HabitRepo::update(conn, &habit)?;
    info!("habit {} updated", habit.id);
    println_colored!(GREEN, "  ✓ Updated '{}'", habit.name);
    Ok(())
}

pub fn handle_remove(conn: &Connection, key: &str) -> Result<()> {
    let habit = HabitRepo::resolve(conn, key)?;
    HabitRepo::delete(conn, habit.id)?;
    info!("habit {} deleted", habit.id);
    println_colored!(RED, "  ✗ Deleted '{}' and its history", habit.name);
    Ok(())
}

pub fn handle_list(
    conn: &Connection,
    today: NaiveDate,
    search: Option<&str>,
    completed_today: bool,
) -> Result<()> {
    let mut habits = HabitRepo::list(conn, search)?;
    if completed_today {
        let done = CompletionRepo::habit_ids_completed_on(conn, today)?;
        habits.retain(|h| done.contains(&h.id));
    }

    println!();
    if habits.is_empty() {
        println_colored!(DIM, "  No habits found. Add one with `habitus add <name>`.");
        println!();
        return Ok(());
    }

    let window = week_window(today);
    for habit in &habits {
        let completions =
            CompletionRepo::for_habit_between(conn, habit.id, window.start(), window.end())?;
        let week = week_day_statuses(&window, &completions);
        let dots: String = week
            .iter()
            .map(|d| if d.completed { '●' } else { '○' })
            .collect();
        let done = week.iter().filter(|d| d.completed).count();
        let marker = if completions.contains(today) { "✓" } else { " " };

        println!(
            "  {} #{:<3} {:<24} {}  {}/{} this week",
            marker, habit.id, habit.name, dots, done, habit.target_frequency
        );
        if let Some(description) = &habit.description {
            println_colored!(DIM, "          {}", description);
        }
    }
    println!();
    Ok(())
}

// ─── Completions ─────────────────────────────────────────────────────────────

pub fn handle_done(conn: &Connection, today: NaiveDate, key: &str, date: Option<&str>) -> Result<()> {
    let date = resolve_date(date, today)?;
    let habit = HabitRepo::resolve(conn, key)?;

    if CompletionRepo::add(conn, habit.id, date)? {
        info!("habit {} completed on {}", habit.id, date);
        println_colored!(GREEN, "  ✓ {} marked as complete for {}", habit.name, format_date(date));
    } else {
        println_colored!(AMBER, "  {} already completed for {}", habit.name, format_date(date));
    }
    Ok(())
}

pub fn handle_undo(conn: &Connection, today: NaiveDate, key: &str, date: Option<&str>) -> Result<()> {
    let date = resolve_date(date, today)?;
    let habit = HabitRepo::resolve(conn, key)?;

    if !CompletionRepo::remove(conn, habit.id, date)? {
        return Err(anyhow!(
            "Completion not found for '{}' on {}",
            habit.name,
            format_date(date)
        ));
    }
    info!("habit {} uncompleted on {}", habit.id, date);
    println_colored!(AMBER, "  ↺ Removed completion of {} on {}", habit.name, format_date(date));
    Ok(())
}

// ─── Views ───────────────────────────────────────────────────────────────────

pub fn handle_week(
    conn: &Connection,
    today: NaiveDate,
    key: &str,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let reference = resolve_date(date, today)?;
    let habit = HabitRepo::resolve(conn, key)?;

    let window = week_window(reference);
    let completions =
        CompletionRepo::for_habit_between(conn, habit.id, window.start(), window.end())?;
    let view = WeekView {
        week: week_day_statuses(&window, &completions).to_vec(),
    };

    if json {
        return print_json(&view);
    }

    let streak = day_streak_from_week(&view.week, today);
    let done = view.completed_days() as u32;
    let target = habit.target_frequency.get();

    println!();
    println_colored!(BOLD, "  {} — week of {}", habit.name, format_date(window.start()));
    println!();
    for day in &view.week {
        if day.completed {
            println_colored!(GREEN, "  {}  ● done", format_day(day.date));
        } else if day.date > today {
            println_colored!(DIM, "  {}  ·", format_day(day.date));
        } else {
            println_colored!(DIM, "  {}  ○", format_day(day.date));
        }
    }
    println!();
    println!("  {}  {}/{} this week", progress_bar(done, target, 14), done, target);
    println!(
        "  Streak: {} (best: {})",
        format_streak_count(streak.current_streak, StreakUnit::Day),
        format_streak_count(streak.best_streak, StreakUnit::Day)
    );
    println!();
    Ok(())
}

pub fn handle_streak(conn: &Connection, today: NaiveDate, key: &str, json: bool) -> Result<()> {
    let habit = HabitRepo::resolve(conn, key)?;
    let completions = CompletionRepo::for_habit(conn, habit.id)?;
    let streak = day_streak(&completions, today);
    debug!("day streak for habit {}: {:?}", habit.id, streak);

    if json {
        return print_json(&streak);
    }

    println!();
    println_colored!(BOLD, "  {}", habit.name);
    println!();
    println_colored!(
        GREEN,
        "  Current:  {}",
        format_streak_count(streak.current_streak, StreakUnit::Day)
    );
    println!("  Best:     {}", format_streak_count(streak.best_streak, StreakUnit::Day));
    println!("  Longest:  {}", format_streak_count(streak.longest_streak, StreakUnit::Day));
    if completions.is_empty() {
        println_colored!(DIM, "  No completions yet. Mark one with `habitus done {}`.", habit.id);
    }
    println!();
    Ok(())
}

pub fn handle_stats(
    conn: &Connection,
    config: &AppConfig,
    today: NaiveDate,
    key: &str,
    weeks: Option<usize>,
    json: bool,
) -> Result<()> {
    let habit = HabitRepo::resolve(conn, key)?;
    let completions = CompletionRepo::for_habit(conn, habit.id)?;
    let trailing_weeks = weeks.unwrap_or(config.stats.trailing_weeks);
    let statistics = HabitStatistics::from_completions(
        &habit,
        &completions,
        trailing_weeks,
        config.stats.rate_window_days,
        today,
    )?;
    debug!("statistics for habit {}: {:?}", habit.id, statistics);

    if json {
        return print_json(&StatisticsReport { statistics });
    }

    println!();
    println_colored!(
        BOLD,
        "  {} — {} days/week",
        statistics.habit_name,
        statistics.target_frequency
    );
    println!();
    println_colored!(
        GREEN,
        "  Current streak:  {}",
        format_streak_count(statistics.current_streak, StreakUnit::Week)
    );
    println!(
        "  Best streak:     {}",
        format_streak_count(statistics.best_streak, StreakUnit::Week)
    );
    println!(
        "  Completion rate: {}  {}",
        progress_bar(statistics.completion_rate, 100, 14),
        format_percent(f64::from(statistics.completion_rate))
    );
    println_colored!(DIM, "                   last {} weeks with activity", trailing_weeks);
    println!(
        "  Last {} days:    {}  {}",
        config.stats.rate_window_days,
        progress_bar(statistics.day_completion_rate.round() as u32, 100, 14),
        format_percent(statistics.day_completion_rate)
    );
    println!("  Completions:     {}", statistics.total_completions);
    println!();
    Ok(())
}

pub fn handle_overview(conn: &Connection, json: bool) -> Result<()> {
    let habits = HabitRepo::list(conn, None)?;
    let overview = HabitOverview::from_habits(&habits);
    debug!("overview: {:?}", overview);

    if json {
        return print_json(&overview);
    }

    println!();
    println_colored!(BOLD, "  Overview");
    println!();
    println!("  Habits:            {}", overview.total_habits);
    println!("  Weekly target:     {} days", overview.weekly_target_days);
    println!("  Average target:    {:.1}x per week", overview.average_target_frequency);
    if habits.is_empty() {
        println_colored!(DIM, "  No habits yet. Add one with `habitus add <name>`.");
    } else {
        println!();
        for habit in &habits {
            println_colored!(DIM, "  #{:<3} {:<24} {}/week", habit.id, habit.name, habit.target_frequency);
        }
    }
    println!();
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if init {
        if path.exists() {
            println_colored!(AMBER, "  Config already exists at {}", path.display());
        } else {
            config.save()?;
            println_colored!(GREEN, "  ✓ Wrote defaults to {}", path.display());
        }
    }
    println_colored!(DIM, "# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn resolve_date(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match arg {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(today),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::prepare;

    fn setup() -> (Connection, AppConfig) {
        let conn = Connection::open_in_memory().unwrap();
        prepare(&conn).unwrap();
        (conn, AppConfig::default())
    }

    fn today() -> NaiveDate {
        parse_date("2026-10-19").unwrap()
    }

    #[test]
    fn resolve_date_defaults_to_today() {
        let today = parse_date("2026-10-19").unwrap();
        assert_eq!(resolve_date(None, today).unwrap(), today);
        assert_eq!(
            resolve_date(Some("2026-10-01"), today).unwrap(),
            parse_date("2026-10-01").unwrap()
        );
    }

    #[test]
    fn resolve_date_rejects_malformed_input() {
        let today = parse_date("2026-10-19").unwrap();
        let err = resolve_date(Some("yesterday"), today).unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
    }

    #[test]
    fn undo_without_completion_is_not_found() {
        let (conn, config) = setup();
        handle_add(&conn, &config, "Read", None, Some(3)).unwrap();

        let err = handle_undo(&conn, today(), "Read", Some("2026-10-18")).unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
        assert!(err.to_string().contains("2026-10-18"), "{err}");
    }

    #[test]
    fn done_twice_keeps_one_completion_and_undo_removes_it() {
        let (conn, config) = setup();
        handle_add(&conn, &config, "Read", None, None).unwrap();

        handle_done(&conn, today(), "read", None).unwrap();
        handle_done(&conn, today(), "read", None).unwrap();
        let habit = HabitRepo::resolve(&conn, "Read").unwrap();
        assert_eq!(CompletionRepo::for_habit(&conn, habit.id).unwrap().len(), 1);

        handle_undo(&conn, today(), "Read", None).unwrap();
        assert!(CompletionRepo::for_habit(&conn, habit.id).unwrap().is_empty());
        assert!(handle_undo(&conn, today(), "Read", None).is_err());
    }

    #[test]
    fn unknown_habit_is_an_error() {
        let (conn, _) = setup();
        assert!(handle_done(&conn, today(), "Nope", None).is_err());
        assert!(handle_stats(&conn, &AppConfig::default(), today(), "Nope", None, true).is_err());
    }

    #[test]
    fn overview_runs_with_and_without_habits() {
        let (conn, config) = setup();
        handle_overview(&conn, false).unwrap();
        handle_overview(&conn, true).unwrap();

        handle_add(&conn, &config, "Read", None, Some(3)).unwrap();
        handle_add(&conn, &config, "Run", None, Some(5)).unwrap();
        let overview = HabitOverview::from_habits(&HabitRepo::list(&conn, None).unwrap());
        assert_eq!(overview.total_habits, 2);
        assert_eq!(overview.weekly_target_days, 8);
        handle_overview(&conn, true).unwrap();
    }
}
