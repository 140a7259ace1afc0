//! Habits and their daily completions.
//!
//! Provides the habit model, completion entries and SQLite-backed storage.

mod completion;
mod habit;
mod storage;

pub use completion::{CompleteRequest, Completion, CompletionWithHabit, Mood, DEFAULT_DIFFICULTY};
pub use habit::{
    Category, Frequency, Habit, HabitStatus, HabitUpdate, NewHabit, Reminder, DEFAULT_COLOR,
    DEFAULT_ICON, DEFAULT_UNIT,
};
pub use storage::{HabitFilter, HabitStore};
