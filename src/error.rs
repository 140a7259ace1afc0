//! Error types for habitflow.

use thiserror::Error;

/// Errors that can occur while managing habits and statistics.
#[derive(Error, Debug)]
pub enum HabitError {
    /// Configuration could not be loaded, saved, or resolved.
    #[error("Config error: {0}")]
    Config(String),

    /// The `SQLite` store failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A habit or completion record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input failed validation.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Input or stored data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Filesystem or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for HabitError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for HabitError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<rusqlite::Error> for HabitError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl HabitError {
    /// Build a not-found error for a habit id.
    #[must_use]
    pub fn habit_not_found(id: i64) -> Self {
        Self::NotFound(format!("habit {id}"))
    }
}
