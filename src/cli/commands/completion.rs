//! Daily completion commands.

use super::Context;
use crate::cli::args::{DoneArgs, OutputFormat};
use crate::error::HabitError;
use crate::features::habits::{CompleteRequest, HabitFilter, Mood};
use crate::output::{format_completion, format_habits, format_history};

/// Mark a habit done.
///
/// # Errors
///
/// Returns an error for invalid input, unknown or archived habits, or storage
/// failures.
pub fn done(ctx: &mut Context, args: DoneArgs, format: OutputFormat) -> Result<String, HabitError> {
    let date = ctx.resolve_day(args.date.as_deref())?;

    let mut request = CompleteRequest::new(args.habit, date);
    request.completed_count = args.count;
    request.notes = args.notes;
    request.mood = args.mood.as_deref().map(Mood::parse).transpose()?;
    request.difficulty = args.difficulty;
    request.time_spent = args.time_spent;

    let entry = ctx.store.complete(&request, ctx.today, ctx.now)?;
    let habit = ctx.store.require(args.habit)?;
    format_completion(&habit, &entry, format)
}

/// Undo a habit's completion for a day.
///
/// # Errors
///
/// Returns `HabitError::NotFound` if there is nothing to undo.
pub fn undo(
    ctx: &mut Context,
    habit_id: i64,
    date: Option<&str>,
    format: OutputFormat,
) -> Result<String, HabitError> {
    let date = ctx.resolve_day(date)?;
    let entry = ctx.store.uncomplete(habit_id, date, ctx.today, ctx.now)?;
    let habit = ctx.store.require(habit_id)?;
    format_completion(&habit, &entry, format)
}

/// Today's checklist of active habits.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn today(ctx: &Context, format: OutputFormat) -> Result<String, HabitError> {
    let filter = HabitFilter {
        category: None,
        active: Some(true),
    };
    let habits = ctx.store.list_with_status(filter, ctx.today)?;
    let title = format!("Today {}", ctx.today.format("%a %b %d"));
    format_habits(&habits, &title, format)
}

/// Completion history, newest first.
///
/// # Errors
///
/// Returns an error for unparseable dates or storage failures.
pub fn history(
    ctx: &Context,
    from: Option<&str>,
    to: Option<&str>,
    habit: Option<i64>,
    format: OutputFormat,
) -> Result<String, HabitError> {
    let from = from.map(|s| ctx.resolve_day(Some(s))).transpose()?;
    let to = to.map(|s| ctx.resolve_day(Some(s))).transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(HabitError::Validation(format!(
                "--from ({from}) is after --to ({to})"
            )));
        }
    }
    if let Some(id) = habit {
        ctx.store.require(id)?;
    }

    let entries = ctx.store.history(from, to, habit)?;
    format_history(&entries, format)
}
