//! Command implementations for habitflow.
//!
//! This module contains the implementation of all CLI commands. Each command
//! returns the text to print, already formatted for the requested output.

mod completion;
mod config;
mod habit;
mod shell;
mod stats;

pub use completion::{done, history, today, undo};
pub use config::config;
pub use habit::habit;
pub use shell::completions;
pub use stats::stats;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::config::{Config, Paths};
use crate::core::parse_day;
use crate::error::HabitError;
use crate::features::habits::HabitStore;

/// Everything a command needs to run.
pub struct Context {
    /// Habit storage.
    pub store: HabitStore,
    /// Effective configuration.
    pub config: Config,
    /// The current local day.
    pub today: NaiveDate,
    /// The current instant.
    pub now: DateTime<Utc>,
}

impl Context {
    /// Open the database under `paths` and capture the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(paths: &Paths, config: Config) -> Result<Self, HabitError> {
        let db = crate::storage::Database::open(paths)?;
        let store = HabitStore::with_database(db).with_lookback(config.stats.streak_lookback_days);
        let now = Local::now();

        Ok(Self {
            store,
            config,
            today: now.date_naive(),
            now: now.with_timezone(&Utc),
        })
    }

    /// Resolve an optional day argument, defaulting to today.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the expression cannot be parsed.
    pub fn resolve_day(&self, input: Option<&str>) -> Result<NaiveDate, HabitError> {
        input.map_or(Ok(self.today), |s| {
            parse_day(s, self.today)
                .ok_or_else(|| HabitError::Validation(format!("could not parse date '{s}'")))
        })
    }
}
