//! Habit and completion storage.
//!
//! Persists habits and daily completion entries to the local database.
//! Every write to a completion recomputes the owning habit's cached streak
//! fields inside the same transaction, so the cache never outlives the
//! records it was derived from.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::completion::{CompleteRequest, Completion, CompletionWithHabit, Mood, DEFAULT_DIFFICULTY};
use super::habit::{Category, Frequency, Habit, HabitStatus, HabitUpdate, NewHabit, Reminder};
use crate::error::HabitError;
use crate::features::stats::{
    compute_current_streak, compute_longest_streak, CompletionRecord, CompletionSource, Scope,
};
use crate::storage::Database;

const HABIT_COLUMNS: &str = "id, name, description, category, color, icon, frequency, \
     target_count, unit, is_active, reminder, created_at, updated_at, \
     total_completions, current_streak, longest_streak, last_completed_date";

const COMPLETION_COLUMNS: &str = "c.id, c.habit_id, c.date, c.completed, c.completed_count, \
     c.notes, c.mood, c.difficulty, c.time_spent, c.completed_at, c.created_at, c.updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filter for listing habits.
#[derive(Debug, Clone, Copy, Default)]
pub struct HabitFilter {
    /// Only habits in this category.
    pub category: Option<Category>,
    /// Only active (`true`) or archived (`false`) habits.
    pub active: Option<bool>,
}

/// Storage for habits and completions.
pub struct HabitStore {
    db: Database,
    lookback_days: u32,
}

impl HabitStore {
    /// Default number of past days examined when refreshing current streaks.
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self {
            db,
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
        }
    }

    /// Set how far back cached current streaks may reach.
    #[must_use]
    pub const fn with_lookback(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    // ---- habits -------------------------------------------------------

    /// Insert a new habit.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input or a database error.
    pub fn create(&self, habit: NewHabit, now: DateTime<Utc>) -> Result<Habit, HabitError> {
        let habit = habit.validated()?;
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO habits
              (name, description, category, color, icon, frequency, target_count,
               unit, is_active, reminder, created_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?10)",
            params![
                habit.name,
                habit.description,
                habit.category.as_str(),
                habit.color,
                habit.icon,
                serde_json::to_string(&habit.frequency)?,
                habit.target_count,
                habit.unit,
                serde_json::to_string(&habit.reminder)?,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| HabitError::Database(format!("Failed to insert habit: {e}")))?;

        let id = conn.last_insert_rowid();
        info!(id, name = %habit.name, "created habit");
        self.require(id)
    }

    /// Get a habit by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<Habit>, HabitError> {
        fetch_habit(self.db.connection(), id)
    }

    /// Get a habit by ID, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::NotFound` for unknown IDs.
    pub fn require(&self, id: i64) -> Result<Habit, HabitError> {
        self.get(id)?.ok_or_else(|| HabitError::habit_not_found(id))
    }

    /// List habits, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, filter: HabitFilter) -> Result<Vec<Habit>, HabitError> {
        let mut sql = format!("SELECT {HABIT_COLUMNS} FROM habits WHERE 1 = 1");
        let mut values = Vec::new();

        if let Some(category) = filter.category {
            values.push(Value::Text(category.as_str().to_string()));
            sql.push_str(&format!(" AND category = ?{}", values.len()));
        }
        if let Some(active) = filter.active {
            values.push(Value::Integer(i64::from(active)));
            sql.push_str(&format!(" AND is_active = ?{}", values.len()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params_from_iter(values.iter()), row_to_habit)
            .map_err(|e| HabitError::Database(format!("Failed to query habits: {e}")))?;

        collect_rows(rows)
    }

    /// List habits together with their completion status on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_with_status(
        &self,
        filter: HabitFilter,
        today: NaiveDate,
    ) -> Result<Vec<HabitStatus>, HabitError> {
        let habits = self.list(filter)?;
        let todays = self.completions(Scope::All, today, today)?;

        Ok(habits
            .into_iter()
            .map(|habit| {
                let entry = todays.iter().find(|c| c.habit_id == habit.id);
                HabitStatus {
                    completed_today: entry.is_some_and(|c| c.completed),
                    today_completed_count: entry.map_or(0, |c| c.completed_count),
                    habit,
                }
            })
            .collect())
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::NotFound` for unknown IDs or a validation error.
    pub fn update(
        &self,
        id: i64,
        update: &HabitUpdate,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError> {
        let current = self.require(id)?;
        if update.is_empty() {
            return Ok(current);
        }
        let habit = update.apply_to(&current)?;

        self.db
            .connection()
            .execute(
                r"UPDATE habits SET
                  name = ?1, description = ?2, category = ?3, color = ?4, icon = ?5,
                  frequency = ?6, target_count = ?7, unit = ?8, is_active = ?9,
                  reminder = ?10, updated_at = ?11
                  WHERE id = ?12",
                params![
                    habit.name,
                    habit.description,
                    habit.category.as_str(),
                    habit.color,
                    habit.icon,
                    serde_json::to_string(&habit.frequency)?,
                    habit.target_count,
                    habit.unit,
                    habit.is_active,
                    serde_json::to_string(&habit.reminder)?,
                    now.to_rfc3339(),
                    id,
                ],
            )
            .map_err(|e| HabitError::Database(format!("Failed to update habit: {e}")))?;

        info!(id, "updated habit");
        self.require(id)
    }

    /// Delete a habit and all of its completions.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::NotFound` for unknown IDs.
    pub fn delete(&self, id: i64) -> Result<(), HabitError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM habits WHERE id = ?1", [id])
            .map_err(|e| HabitError::Database(format!("Failed to delete habit: {e}")))?;

        if rows == 0 {
            return Err(HabitError::habit_not_found(id));
        }
        info!(id, "deleted habit");
        Ok(())
    }

    // ---- completions --------------------------------------------------

    /// Mark a habit done for a day and refresh its cached statistics.
    ///
    /// An existing entry for that day is upgraded: it becomes completed, its
    /// count becomes the larger of the old and new counts, and optional
    /// fields are overwritten only when supplied.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad requests, `HabitError::NotFound`
    /// when the habit is missing or archived, or a database error.
    pub fn complete(
        &mut self,
        request: &CompleteRequest,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Completion, HabitError> {
        request.validate(today)?;
        let lookback = self.lookback_days;

        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(|e| HabitError::Database(format!("Failed to begin transaction: {e}")))?;

        match fetch_habit(&tx, request.habit_id)? {
            Some(h) if h.is_active => {}
            _ => return Err(HabitError::habit_not_found(request.habit_id)),
        }

        let date = request.date.format(DATE_FORMAT).to_string();
        let now_str = now.to_rfc3339();
        let existing = fetch_completion(&tx, request.habit_id, request.date)?;

        if let Some(entry) = existing {
            tx.execute(
                r"UPDATE habit_completions SET
                  completed = 1,
                  completed_count = MAX(completed_count, ?1),
                  notes = COALESCE(?2, notes),
                  mood = COALESCE(?3, mood),
                  difficulty = COALESCE(?4, difficulty),
                  time_spent = COALESCE(?5, time_spent),
                  completed_at = ?6,
                  updated_at = ?6
                  WHERE id = ?7",
                params![
                    request.completed_count,
                    request.notes,
                    request.mood.map(|m| m.as_str()),
                    request.difficulty,
                    request.time_spent,
                    now_str,
                    entry.id,
                ],
            )
            .map_err(|e| HabitError::Database(format!("Failed to update completion: {e}")))?;
        } else {
            tx.execute(
                r"INSERT INTO habit_completions
                  (habit_id, date, completed, completed_count, notes, mood, difficulty,
                   time_spent, completed_at, created_at, updated_at)
                  VALUES (?1, ?2, 1, ?3, ?4, ?5, ?6, ?7, ?8, ?8, ?8)",
                params![
                    request.habit_id,
                    date,
                    request.completed_count,
                    request.notes,
                    request.mood.unwrap_or_default().as_str(),
                    request.difficulty.unwrap_or(DEFAULT_DIFFICULTY),
                    request.time_spent,
                    now_str,
                ],
            )
            .map_err(|e| HabitError::Database(format!("Failed to insert completion: {e}")))?;
        }

        refresh_habit_stats(&tx, request.habit_id, today, lookback)?;
        let completion = fetch_completion(&tx, request.habit_id, request.date)?
            .ok_or_else(|| HabitError::Database("completion vanished after write".to_string()))?;

        tx.commit()
            .map_err(|e| HabitError::Database(format!("Failed to commit: {e}")))?;

        info!(habit_id = request.habit_id, %date, "marked habit complete");
        Ok(completion)
    }

    /// Undo a day's completion and refresh the habit's cached statistics.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::NotFound` when the habit or the day's entry is
    /// missing.
    pub fn uncomplete(
        &mut self,
        habit_id: i64,
        date: NaiveDate,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Completion, HabitError> {
        let lookback = self.lookback_days;
        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(|e| HabitError::Database(format!("Failed to begin transaction: {e}")))?;

        if fetch_habit(&tx, habit_id)?.is_none() {
            return Err(HabitError::habit_not_found(habit_id));
        }

        let rows = tx
            .execute(
                r"UPDATE habit_completions SET
                  completed = 0, completed_count = 0, completed_at = NULL, updated_at = ?1
                  WHERE habit_id = ?2 AND date = ?3",
                params![now.to_rfc3339(), habit_id, date.format(DATE_FORMAT).to_string()],
            )
            .map_err(|e| HabitError::Database(format!("Failed to undo completion: {e}")))?;

        if rows == 0 {
            return Err(HabitError::NotFound(format!(
                "no completion for habit {habit_id} on {date}"
            )));
        }

        refresh_habit_stats(&tx, habit_id, today, lookback)?;
        let completion = fetch_completion(&tx, habit_id, date)?
            .ok_or_else(|| HabitError::Database("completion vanished after write".to_string()))?;

        tx.commit()
            .map_err(|e| HabitError::Database(format!("Failed to commit: {e}")))?;

        info!(habit_id, %date, "undid habit completion");
        Ok(completion)
    }

    /// Most recent completion entries for a habit, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_completions(
        &self,
        habit_id: i64,
        limit: usize,
    ) -> Result<Vec<Completion>, HabitError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COMPLETION_COLUMNS} FROM habit_completions c
                 WHERE c.habit_id = ?1
                 ORDER BY c.date DESC
                 LIMIT ?2"
            ))
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params![habit_id, limit], row_to_completion)
            .map_err(|e| HabitError::Database(format!("Failed to query completions: {e}")))?;

        collect_rows(rows)
    }

    /// Completion history with habit names, newest first.
    ///
    /// Any bound left as `None` is unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        habit_id: Option<i64>,
    ) -> Result<Vec<CompletionWithHabit>, HabitError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COMPLETION_COLUMNS}, h.name
                 FROM habit_completions c
                 JOIN habits h ON h.id = c.habit_id
                 WHERE (?1 IS NULL OR c.date >= ?1)
                   AND (?2 IS NULL OR c.date <= ?2)
                   AND (?3 IS NULL OR c.habit_id = ?3)
                 ORDER BY c.date DESC, c.habit_id ASC"
            ))
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(
                params![
                    from.map(|d| d.format(DATE_FORMAT).to_string()),
                    to.map(|d| d.format(DATE_FORMAT).to_string()),
                    habit_id,
                ],
                |row| {
                    Ok(CompletionWithHabit {
                        completion: row_to_completion(row)?,
                        habit_name: row.get(12)?,
                    })
                },
            )
            .map_err(|e| HabitError::Database(format!("Failed to query history: {e}")))?;

        collect_rows(rows)
    }

    /// Recompute the cached statistics of one habit.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::NotFound` for unknown IDs.
    pub fn refresh_stats(&self, habit_id: i64, today: NaiveDate) -> Result<Habit, HabitError> {
        let conn = self.db.connection();
        if fetch_habit(conn, habit_id)?.is_none() {
            return Err(HabitError::habit_not_found(habit_id));
        }
        refresh_habit_stats(conn, habit_id, today, self.lookback_days)?;
        self.require(habit_id)
    }

    /// Recompute the cached statistics of every habit.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn refresh_all(&self, today: NaiveDate) -> Result<Vec<Habit>, HabitError> {
        let ids: Vec<i64> = self.list(HabitFilter::default())?.iter().map(|h| h.id).collect();
        ids.into_iter()
            .map(|id| self.refresh_stats(id, today))
            .collect()
    }
}

impl CompletionSource for HabitStore {
    fn completions(
        &self,
        scope: Scope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, HabitError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COMPLETION_COLUMNS} FROM habit_completions c
                 WHERE c.date >= ?1 AND c.date <= ?2
                   AND (?3 IS NULL OR c.habit_id = ?3)
                 ORDER BY c.date ASC, c.habit_id ASC"
            ))
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(
                params![
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string(),
                    scope.habit_id(),
                ],
                row_to_completion,
            )
            .map_err(|e| HabitError::Database(format!("Failed to query completions: {e}")))?;

        collect_rows(rows)
    }

    fn habits(&self, active_only: bool) -> Result<Vec<Habit>, HabitError> {
        self.list(HabitFilter {
            category: None,
            active: active_only.then_some(true),
        })
    }
}

/// Rewrite a habit's cached streak fields from its completed records.
fn refresh_habit_stats(
    conn: &Connection,
    habit_id: i64,
    today: NaiveDate,
    lookback_days: u32,
) -> Result<(), HabitError> {
    let mut stmt = conn
        .prepare(
            "SELECT date FROM habit_completions
             WHERE habit_id = ?1 AND completed = 1
             ORDER BY date ASC",
        )
        .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

    let dates: Vec<NaiveDate> = collect_rows(
        stmt.query_map([habit_id], |row| parse_day(row, 0))
            .map_err(|e| HabitError::Database(format!("Failed to query completions: {e}")))?,
    )?;

    let records: Vec<CompletionRecord> = dates
        .iter()
        .map(|&date| CompletionRecord::done(habit_id, date))
        .collect();

    let current = compute_current_streak(&records, today, lookback_days);
    let longest = compute_longest_streak(&records);
    let last = dates.last().map(|d| d.format(DATE_FORMAT).to_string());

    debug!(habit_id, total = records.len(), current, longest, "refreshed habit stats");

    conn.execute(
        r"UPDATE habits SET
          total_completions = ?1, current_streak = ?2, longest_streak = ?3,
          last_completed_date = ?4
          WHERE id = ?5",
        params![records.len(), current, longest, last, habit_id],
    )
    .map_err(|e| HabitError::Database(format!("Failed to update habit stats: {e}")))?;

    Ok(())
}

fn fetch_habit(conn: &Connection, id: i64) -> Result<Option<Habit>, HabitError> {
    conn.query_row(
        &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
        [id],
        row_to_habit,
    )
    .optional()
    .map_err(|e| HabitError::Database(format!("Failed to query habit: {e}")))
}

fn fetch_completion(
    conn: &Connection,
    habit_id: i64,
    date: NaiveDate,
) -> Result<Option<Completion>, HabitError> {
    conn.query_row(
        &format!(
            "SELECT {COMPLETION_COLUMNS} FROM habit_completions c
             WHERE c.habit_id = ?1 AND c.date = ?2"
        ),
        params![habit_id, date.format(DATE_FORMAT).to_string()],
        row_to_completion,
    )
    .optional()
    .map_err(|e| HabitError::Database(format!("Failed to query completion: {e}")))
}

fn collect_rows<T>(
    rows: impl Iterator<Item = Result<T, rusqlite::Error>>,
) -> Result<Vec<T>, HabitError> {
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| HabitError::Database(e.to_string()))
}

/// Convert a database row to a Habit.
fn row_to_habit(row: &Row<'_>) -> Result<Habit, rusqlite::Error> {
    let category: String = row.get(3)?;
    let frequency: String = row.get(6)?;
    let reminder: String = row.get(10)?;
    let last_completed: Option<String> = row.get(16)?;

    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: Category::parse(&category).map_err(|e| conversion_error(3, e))?,
        color: row.get(4)?,
        icon: row.get(5)?,
        frequency: serde_json::from_str::<Frequency>(&frequency)
            .map_err(|e| conversion_error(6, e))?,
        target_count: row.get(7)?,
        unit: row.get(8)?,
        is_active: row.get(9)?,
        reminder: serde_json::from_str::<Reminder>(&reminder)
            .map_err(|e| conversion_error(10, e))?,
        created_at: parse_timestamp(row, 11)?,
        updated_at: parse_timestamp(row, 12)?,
        total_completions: row.get(13)?,
        current_streak: row.get(14)?,
        longest_streak: row.get(15)?,
        last_completed_date: last_completed
            .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
            .transpose()
            .map_err(|e| conversion_error(16, e))?,
    })
}

/// Convert a database row to a Completion.
fn row_to_completion(row: &Row<'_>) -> Result<Completion, rusqlite::Error> {
    let mood: String = row.get(6)?;
    let completed_at: Option<String> = row.get(9)?;

    Ok(Completion {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: parse_day(row, 2)?,
        completed: row.get(3)?,
        completed_count: row.get(4)?,
        notes: row.get(5)?,
        mood: Mood::parse(&mood).map_err(|e| conversion_error(6, e))?,
        difficulty: row.get(7)?,
        time_spent: row.get(8)?,
        completed_at: completed_at
            .map(|s| DateTime::parse_from_rfc3339(&s).map(|t| t.with_timezone(&Utc)))
            .transpose()
            .map_err(|e| conversion_error(9, e))?,
        created_at: parse_timestamp(row, 10)?,
        updated_at: parse_timestamp(row, 11)?,
    })
}

fn parse_day(row: &Row<'_>, idx: usize) -> Result<NaiveDate, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> HabitStore {
        HabitStore::with_database(Database::open_in_memory().unwrap())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap()
    }

    fn add(store: &HabitStore, name: &str, d: u32) -> Habit {
        store.create(NewHabit::new(name, Category::Health), at(d)).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let store = store();
        let habit = add(&store, "  Drink water ", 1);

        assert_eq!(habit.name, "Drink water");
        assert_eq!(habit.category, Category::Health);
        assert_eq!(habit.frequency, Frequency::Daily);
        assert!(habit.is_active);
        assert_eq!(habit.total_completions, 0);

        let loaded = store.get(habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Drink water");
        assert!(store.get(999).unwrap().is_none());
        assert!(matches!(store.require(999), Err(HabitError::NotFound(_))));
    }

    #[test]
    fn test_create_rejects_invalid() {
        let store = store();
        let mut habit = NewHabit::new("Run", Category::Fitness);
        habit.color = "#12345".to_string();
        assert!(matches!(
            store.create(habit, at(1)),
            Err(HabitError::Validation(_))
        ));
    }

    #[test]
    fn test_list_filters_and_order() {
        let store = store();
        let a = add(&store, "A", 1);
        let b = store
            .create(NewHabit::new("B", Category::Learning), at(2))
            .unwrap();
        let c = add(&store, "C", 3);
        store
            .update(
                c.id,
                &HabitUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
                at(4),
            )
            .unwrap();

        let all = store.list(HabitFilter::default()).unwrap();
        assert_eq!(
            all.iter().map(|h| h.id).collect::<Vec<_>>(),
            vec![c.id, b.id, a.id]
        );

        let health = store
            .list(HabitFilter {
                category: Some(Category::Health),
                active: None,
            })
            .unwrap();
        assert_eq!(health.len(), 2);

        let active_health = store
            .list(HabitFilter {
                category: Some(Category::Health),
                active: Some(true),
            })
            .unwrap();
        assert_eq!(active_health.len(), 1);
        assert_eq!(active_health[0].id, a.id);
    }

    #[test]
    fn test_update_partial() {
        let store = store();
        let habit = add(&store, "Read", 1);

        let updated = store
            .update(
                habit.id,
                &HabitUpdate {
                    name: Some(" Read more ".to_string()),
                    target_count: Some(20),
                    unit: Some("pages".to_string()),
                    ..Default::default()
                },
                at(2),
            )
            .unwrap();

        assert_eq!(updated.name, "Read more");
        assert_eq!(updated.target_count, 20);
        assert_eq!(updated.unit, "pages");
        assert_eq!(updated.color, habit.color);
        assert_eq!(updated.updated_at, at(2));
    }

    #[test]
    fn test_delete_cascades() {
        let mut store = store();
        let habit = add(&store, "Read", 1);
        store
            .complete(&CompleteRequest::new(habit.id, day(2)), day(2), at(2))
            .unwrap();

        store.delete(habit.id).unwrap();
        assert!(store.get(habit.id).unwrap().is_none());
        assert!(store.history(None, None, None).unwrap().is_empty());
        assert!(matches!(store.delete(habit.id), Err(HabitError::NotFound(_))));
    }

    #[test]
    fn test_complete_refreshes_cache() {
        let mut store = store();
        let habit = add(&store, "Meditate", 1);

        for d in 1..=3 {
            store
                .complete(&CompleteRequest::new(habit.id, day(d)), day(3), at(3))
                .unwrap();
        }

        let habit = store.require(habit.id).unwrap();
        assert_eq!(habit.total_completions, 3);
        assert_eq!(habit.current_streak, 3);
        assert_eq!(habit.longest_streak, 3);
        assert_eq!(habit.last_completed_date, Some(day(3)));
    }

    #[test]
    fn test_complete_existing_keeps_max_count() {
        let mut store = store();
        let habit = add(&store, "Water", 1);

        let mut req = CompleteRequest::new(habit.id, day(5));
        req.completed_count = 4;
        req.notes = Some("morning".to_string());
        store.complete(&req, day(5), at(5)).unwrap();

        let mut again = CompleteRequest::new(habit.id, day(5));
        again.completed_count = 2;
        again.mood = Some(Mood::Good);
        let entry = store.complete(&again, day(5), at(5)).unwrap();

        assert!(entry.completed);
        assert_eq!(entry.completed_count, 4);
        assert_eq!(entry.notes.as_deref(), Some("morning"));
        assert_eq!(entry.mood, Mood::Good);
        assert_eq!(entry.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(store.history(None, None, Some(habit.id)).unwrap().len(), 1);
    }

    #[test]
    fn test_complete_archived_habit_fails() {
        let mut store = store();
        let habit = add(&store, "Old", 1);
        store
            .update(
                habit.id,
                &HabitUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
                at(2),
            )
            .unwrap();

        let result = store.complete(&CompleteRequest::new(habit.id, day(3)), day(3), at(3));
        assert!(matches!(result, Err(HabitError::NotFound(_))));
    }

    #[test]
    fn test_complete_future_date_fails() {
        let mut store = store();
        let habit = add(&store, "Run", 1);
        let result = store.complete(&CompleteRequest::new(habit.id, day(9)), day(8), at(8));
        assert!(matches!(result, Err(HabitError::Validation(_))));
    }

    #[test]
    fn test_uncomplete() {
        let mut store = store();
        let habit = add(&store, "Run", 1);
        store
            .complete(&CompleteRequest::new(habit.id, day(4)), day(5), at(5))
            .unwrap();
        store
            .complete(&CompleteRequest::new(habit.id, day(5)), day(5), at(5))
            .unwrap();
        assert_eq!(store.require(habit.id).unwrap().current_streak, 2);

        let entry = store.uncomplete(habit.id, day(5), day(5), at(5)).unwrap();
        assert!(!entry.completed);
        assert_eq!(entry.completed_count, 0);
        assert!(entry.completed_at.is_none());

        let habit = store.require(habit.id).unwrap();
        // Today is still in progress, yesterday keeps the streak alive.
        assert_eq!(habit.current_streak, 1);
        assert_eq!(habit.total_completions, 1);

        assert!(matches!(
            store.uncomplete(habit.id, day(1), day(5), at(5)),
            Err(HabitError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_with_status() {
        let mut store = store();
        let a = add(&store, "A", 1);
        let b = add(&store, "B", 1);
        let mut req = CompleteRequest::new(a.id, day(6));
        req.completed_count = 3;
        store.complete(&req, day(6), at(6)).unwrap();

        let statuses = store.list_with_status(HabitFilter::default(), day(6)).unwrap();
        let sa = statuses.iter().find(|s| s.habit.id == a.id).unwrap();
        let sb = statuses.iter().find(|s| s.habit.id == b.id).unwrap();
        assert!(sa.completed_today);
        assert_eq!(sa.today_completed_count, 3);
        assert!(!sb.completed_today);
        assert_eq!(sb.today_completed_count, 0);
    }

    #[test]
    fn test_history_range_and_order() {
        let mut store = store();
        let a = add(&store, "A", 1);
        let b = add(&store, "B", 1);
        for d in [2, 4, 6] {
            store
                .complete(&CompleteRequest::new(a.id, day(d)), day(6), at(6))
                .unwrap();
        }
        store
            .complete(&CompleteRequest::new(b.id, day(4)), day(6), at(6))
            .unwrap();

        let history = store.history(Some(day(3)), Some(day(6)), None).unwrap();
        let dates: Vec<_> = history.iter().map(|h| h.completion.date).collect();
        assert_eq!(dates, vec![day(6), day(4), day(4)]);
        assert_eq!(history[0].habit_name, "A");

        let only_b = store.history(None, None, Some(b.id)).unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].habit_name, "B");
    }

    #[test]
    fn test_recent_completions_limit() {
        let mut store = store();
        let habit = add(&store, "A", 1);
        for d in 1..=5 {
            store
                .complete(&CompleteRequest::new(habit.id, day(d)), day(5), at(5))
                .unwrap();
        }
        let recent = store.recent_completions(habit.id, 3).unwrap();
        assert_eq!(
            recent.iter().map(|c| c.date).collect::<Vec<_>>(),
            vec![day(5), day(4), day(3)]
        );
    }

    #[test]
    fn test_refresh_stats_moves_with_today() {
        let mut store = store();
        let habit = add(&store, "A", 1);
        for d in 1..=3 {
            store
                .complete(&CompleteRequest::new(habit.id, day(d)), day(3), at(3))
                .unwrap();
        }

        let refreshed = store.refresh_stats(habit.id, day(10)).unwrap();
        assert_eq!(refreshed.current_streak, 0);
        assert_eq!(refreshed.longest_streak, 3);
        assert_eq!(store.refresh_all(day(4)).unwrap()[0].current_streak, 3);
    }

    #[test]
    fn test_completion_source_scope() {
        let mut store = store();
        let a = add(&store, "A", 1);
        let b = add(&store, "B", 1);
        store
            .complete(&CompleteRequest::new(a.id, day(2)), day(5), at(5))
            .unwrap();
        store
            .complete(&CompleteRequest::new(b.id, day(3)), day(5), at(5))
            .unwrap();

        let all = store.completions(Scope::All, day(1), day(5)).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].date, day(2));

        let only_a = store.completions(Scope::Habit(a.id), day(1), day(5)).unwrap();
        assert_eq!(only_a.len(), 1);

        assert_eq!(store.habits(true).unwrap().len(), 2);
    }
}
