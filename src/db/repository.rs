use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::analytics::{format_date, CompletionSet, TargetFrequency};
use crate::models::{Habit, NewHabit};

const HABIT_COLUMNS: &str = "id, name, description, target_frequency, created_at, updated_at";

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let target: i64 = row.get(3)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        target_frequency: TargetFrequency::new(target)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

// ─── Habit repo ──────────────────────────────────────────────────────────────

pub struct HabitRepo;

impl HabitRepo {
    pub fn create(conn: &Connection, habit: &NewHabit) -> Result<Habit> {
        let now = timestamp();
        conn.execute(
            "INSERT INTO habits (name, description, target_frequency, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                habit.name,
                habit.description,
                habit.target_frequency.get(),
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("created habit {} ({})", id, habit.name);
        Self::get(conn, id)?.ok_or_else(|| anyhow!("Habit {} vanished after insert", id))
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Habit>> {
        conn.query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
            params![id],
            habit_from_row,
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Habit>> {
        conn.query_row(
            &format!(
                "SELECT {HABIT_COLUMNS} FROM habits WHERE lower(name) = lower(?1)
                 ORDER BY id LIMIT 1"
            ),
            params![name.trim()],
            habit_from_row,
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    /// Look a habit up by numeric id first, then by name.
    pub fn resolve(conn: &Connection, key: &str) -> Result<Habit> {
        if let Ok(id) = key.trim().parse::<i64>() {
            if let Some(habit) = Self::get(conn, id)? {
                return Ok(habit);
            }
        }
        Self::find_by_name(conn, key)?.ok_or_else(|| anyhow!("Habit '{}' not found", key))
    }

    /// Newest first, optionally filtered by a case-insensitive name substring.
    pub fn list(conn: &Connection, search: Option<&str>) -> Result<Vec<Habit>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits
             WHERE ?1 IS NULL OR instr(lower(name), lower(?1)) > 0
             ORDER BY created_at DESC, id DESC"
        ))?;

        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let rows = stmt.query_map(params![search], habit_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn update(conn: &Connection, habit: &Habit) -> Result<Habit> {
        conn.execute(
            "UPDATE habits
             SET name = ?1, description = ?2, target_frequency = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                habit.name,
                habit.description,
                habit.target_frequency.get(),
                timestamp(),
                habit.id
            ],
        )?;
        Self::get(conn, habit.id)?.ok_or_else(|| anyhow!("Habit {} not found", habit.id))
    }

    /// Deletes the habit; its completions go with it.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let removed = conn.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

// ─── Completion repo ─────────────────────────────────────────────────────────

pub struct CompletionRepo;

impl CompletionRepo {
    /// Returns `false` when the habit was already completed on `date`.
    pub fn add(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO habit_completions (habit_id, date) VALUES (?1, ?2)",
            params![habit_id, format_date(date)],
        )?;
        Ok(inserted > 0)
    }

    /// Returns `false` when there was no completion to remove.
    pub fn remove(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let removed = conn.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
            params![habit_id, format_date(date)],
        )?;
        Ok(removed > 0)
    }

    /// Snapshot of every completion of one habit.
    pub fn for_habit(conn: &Connection, habit_id: i64) -> Result<CompletionSet> {
        let mut stmt =
            conn.prepare("SELECT date FROM habit_completions WHERE habit_id = ?1 ORDER BY date")?;
        let dates = stmt
            .query_map(params![habit_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(CompletionSet::parse(dates)?)
    }

    /// Snapshot of one habit's completions in `start..=end`.
    pub fn for_habit_between(
        conn: &Connection,
        habit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CompletionSet> {
        let mut stmt = conn.prepare(
            "SELECT date FROM habit_completions
             WHERE habit_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date",
        )?;
        let dates = stmt
            .query_map(
                params![habit_id, format_date(start), format_date(end)],
                |row| row.get::<_, String>(0),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(CompletionSet::parse(dates)?)
    }

    pub fn habit_ids_completed_on(conn: &Connection, date: NaiveDate) -> Result<HashSet<i64>> {
        let mut stmt = conn.prepare("SELECT habit_id FROM habit_completions WHERE date = ?1")?;
        let ids = stmt
            .query_map(params![format_date(date)], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::parse_date;
    use crate::db::prepare;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        prepare(&conn).unwrap();
        conn
    }

    fn new_habit(name: &str, target: i64) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            description: None,
            target_frequency: TargetFrequency::new(target).unwrap(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn create_and_resolve_by_id_or_name() {
        let conn = setup();
        let habit = HabitRepo::create(&conn, &new_habit("Morning Run", 3)).unwrap();
        assert_eq!(habit.target_frequency.get(), 3);

        assert_eq!(HabitRepo::resolve(&conn, &habit.id.to_string()).unwrap(), habit);
        assert_eq!(HabitRepo::resolve(&conn, "morning run").unwrap(), habit);
        assert!(HabitRepo::resolve(&conn, "Evening Run").is_err());
    }

    #[test]
    fn list_is_newest_first_and_searchable() {
        let conn = setup();
        let read = HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        let run = HabitRepo::create(&conn, &new_habit("Run", 3)).unwrap();
        let stretch = HabitRepo::create(&conn, &new_habit("Stretch", 5)).unwrap();

        let ids: Vec<i64> = HabitRepo::list(&conn, None).unwrap().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![stretch.id, run.id, read.id]);

        let found = HabitRepo::list(&conn, Some("RE")).unwrap();
        let names: Vec<&str> = found.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Stretch", "Read"]);

        assert_eq!(HabitRepo::list(&conn, Some("  ")).unwrap().len(), 3);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let conn = setup();
        HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        assert!(HabitRepo::list(&conn, Some("%")).unwrap().is_empty());
    }

    #[test]
    fn update_persists_changes() {
        let conn = setup();
        let mut habit = HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        habit.name = "Read fiction".to_string();
        habit.target_frequency = TargetFrequency::new(4).unwrap();
        let updated = HabitRepo::update(&conn, &habit).unwrap();
        assert_eq!(updated.name, "Read fiction");
        assert_eq!(updated.target_frequency.get(), 4);
    }

    #[test]
    fn completing_twice_is_idempotent() {
        let conn = setup();
        let habit = HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        assert!(CompletionRepo::add(&conn, habit.id, date("2026-10-19")).unwrap());
        assert!(!CompletionRepo::add(&conn, habit.id, date("2026-10-19")).unwrap());
        assert_eq!(CompletionRepo::for_habit(&conn, habit.id).unwrap().len(), 1);
    }

    #[test]
    fn removing_missing_completion_reports_false() {
        let conn = setup();
        let habit = HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        assert!(!CompletionRepo::remove(&conn, habit.id, date("2026-10-19")).unwrap());
        CompletionRepo::add(&conn, habit.id, date("2026-10-19")).unwrap();
        assert!(CompletionRepo::remove(&conn, habit.id, date("2026-10-19")).unwrap());
    }

    #[test]
    fn range_snapshot_is_inclusive() {
        let conn = setup();
        let habit = HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        for d in ["2026-10-18", "2026-10-19", "2026-10-25", "2026-10-26"] {
            CompletionRepo::add(&conn, habit.id, date(d)).unwrap();
        }
        let week =
            CompletionRepo::for_habit_between(&conn, habit.id, date("2026-10-19"), date("2026-10-25"))
                .unwrap();
        assert_eq!(week.len(), 2);
        assert!(week.contains(date("2026-10-19")));
        assert!(week.contains(date("2026-10-25")));
    }

    #[test]
    fn deleting_habit_cascades_to_completions() {
        let conn = setup();
        let habit = HabitRepo::create(&conn, &new_habit("Read", 7)).unwrap();
        let other = HabitRepo::create(&conn, &new_habit("Run", 3)).unwrap();
        CompletionRepo::add(&conn, habit.id, date("2026-10-19")).unwrap();
        CompletionRepo::add(&conn, other.id, date("2026-10-19")).unwrap();

        assert!(HabitRepo::delete(&conn, habit.id).unwrap());
        assert!(!HabitRepo::delete(&conn, habit.id).unwrap());

        let ids = CompletionRepo::habit_ids_completed_on(&conn, date("2026-10-19")).unwrap();
        assert_eq!(ids, HashSet::from([other.id]));
    }
}
