//! JSON output formatting for habitflow.
//!
//! This module provides functions for formatting habits and completions as JSON.

use serde::Serialize;
use serde_json::json;

use crate::error::HabitError;
use crate::features::habits::{Completion, CompletionWithHabit, Habit, HabitStatus};

/// Format habits with today's status as JSON
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_habits_json(habits: &[HabitStatus], title: &str) -> Result<String, HabitError> {
    let output = json!({
        "list": title,
        "count": habits.len(),
        "items": habits
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a habit with its recent completions as JSON
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_habit_json(habit: &Habit, recent: &[Completion]) -> Result<String, HabitError> {
    let output = json!({
        "habit": habit,
        "recent_completions": recent
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format completion history as JSON
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn format_history_json(entries: &[CompletionWithHabit]) -> Result<String, HabitError> {
    let output = json!({
        "count": entries.len(),
        "items": entries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value as pretty JSON
///
/// # Errors
///
/// Returns `HabitError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, HabitError> {
    Ok(serde_json::to_string_pretty(value)?)
}
