//! Database migrations for habitflow.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;
use tracing::debug;

use crate::error::HabitError;

/// Current schema version.
const CURRENT_VERSION: i32 = 2;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, HabitError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| HabitError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), HabitError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| HabitError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), HabitError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        debug!(version, "applying schema migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), HabitError> {
    match version {
        1 => migrate_v1(conn),
        2 => migrate_v2(conn),
        _ => Err(HabitError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: habits and their daily completions.
///
/// `habit_completions` holds at most one row per habit per day; the streak
/// engine relies on that.
fn migrate_v1(conn: &Connection) -> Result<(), HabitError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            category TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#3B82F6',
            icon TEXT NOT NULL DEFAULT '🎯',
            frequency TEXT NOT NULL DEFAULT '{"type":"daily"}',
            target_count INTEGER NOT NULL DEFAULT 1 CHECK (target_count >= 1),
            unit TEXT NOT NULL DEFAULT 'times',
            is_active INTEGER NOT NULL DEFAULT 1,
            reminder TEXT NOT NULL DEFAULT '{"enabled":false}',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            total_completions INTEGER NOT NULL DEFAULT 0,
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            last_completed_date TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_habits_active
        ON habits(is_active);

        CREATE TABLE IF NOT EXISTS habit_completions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            completed_count INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            mood TEXT NOT NULL DEFAULT 'neutral',
            difficulty INTEGER NOT NULL DEFAULT 3 CHECK (difficulty BETWEEN 1 AND 5),
            time_spent INTEGER,
            completed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (habit_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_completions_date
        ON habit_completions(date);
        "#,
    )
    .map_err(|e| HabitError::Database(format!("Migration v1 failed: {e}")))
}

/// Migration v2: index for completed-only scans used by streak refreshes.
fn migrate_v2(conn: &Connection) -> Result<(), HabitError> {
    conn.execute_batch(
        r"
        CREATE INDEX IF NOT EXISTS idx_completions_habit_completed
        ON habit_completions(habit_id, completed, date);
        ",
    )
    .map_err(|e| HabitError::Database(format!("Migration v2 failed: {e}")))
}
