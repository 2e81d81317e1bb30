pub mod migrations;
pub mod repository;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open the database, apply connection pragmas and bring the schema up to date.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Opening database at {:?}", path))?;
    prepare(&conn)?;
    Ok(conn)
}

pub fn prepare(conn: &Connection) -> Result<()> {
    // WAL for concurrent readers; foreign keys so completions follow their habit.
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    migrations::run_migrations(conn)?;
    Ok(())
}
