//! Path resolution for habitflow configuration and data files.
//!
//! All habitflow data is stored in `~/.habitflow/` unless `HABITFLOW_HOME`
//! points elsewhere:
//! - `config.yaml` - Main configuration file
//! - `habitflow.db` - SQLite database for habits and completions

use std::path::PathBuf;

use crate::error::HabitError;

/// Environment variable that overrides the data root.
pub const HOME_ENV: &str = "HABITFLOW_HOME";

/// Paths to habitflow configuration and data.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.habitflow/`
    pub root: PathBuf,
    /// Config file: `~/.habitflow/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.habitflow/habitflow.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `HABITFLOW_HOME`, falling back to `~/.habitflow`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, HabitError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            HabitError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".habitflow")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("habitflow.db"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), HabitError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                HabitError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
