//! Where statistics read their data from.

use chrono::NaiveDate;

use crate::error::HabitError;
use crate::features::habits::{Completion, Habit};

/// Which completions a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every habit.
    All,
    /// A single habit.
    Habit(i64),
}

impl Scope {
    /// The habit ID this scope is limited to, if any.
    #[must_use]
    pub const fn habit_id(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Habit(id) => Some(id),
        }
    }
}

/// Read access to habits and completion entries.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionSource {
    /// Completion entries dated `start..=end`, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn completions(
        &self,
        scope: Scope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, HabitError>;

    /// All habits, or only active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn habits(&self, active_only: bool) -> Result<Vec<Habit>, HabitError>;
}
