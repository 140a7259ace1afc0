//! Output formatting for habitflow.
//!
//! This module provides formatters for displaying habits and completions in
//! various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::HabitError;
use crate::features::habits::{Completion, CompletionWithHabit, Habit, HabitStatus};

pub use json::*;
pub use pretty::*;

/// Format habits based on output format
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_habits(
    habits: &[HabitStatus],
    title: &str,
    format: OutputFormat,
) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_habits_pretty(habits, title)),
        OutputFormat::Json => format_habits_json(habits, title),
    }
}

/// Format a single habit with recent completions based on output format
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_habit(
    habit: &Habit,
    recent: &[Completion],
    format: OutputFormat,
) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_habit_pretty(habit, recent)),
        OutputFormat::Json => format_habit_json(habit, recent),
    }
}

/// Format a completion change based on output format
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_completion(
    habit: &Habit,
    entry: &Completion,
    format: OutputFormat,
) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_completion_pretty(habit, entry)),
        OutputFormat::Json => to_json(entry),
    }
}

/// Format completion history based on output format
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_history(
    entries: &[CompletionWithHabit],
    format: OutputFormat,
) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(entries)),
        OutputFormat::Json => format_history_json(entries),
    }
}
