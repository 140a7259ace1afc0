//! Habit management commands.

use tracing::warn;

use super::Context;
use crate::cli::args::{AddHabitArgs, EditHabitArgs, HabitCommands, OutputFormat};
use crate::error::HabitError;
use crate::features::habits::{
    Category, Frequency, HabitFilter, HabitStatus, HabitUpdate, NewHabit, Reminder,
};
use crate::output::{format_habit, format_habits};

const RECENT_COMPLETIONS: usize = 30;

/// Execute habit subcommands.
///
/// # Errors
///
/// Returns an error for invalid input, unknown habits or storage failures.
pub fn habit(
    ctx: &Context,
    cmd: HabitCommands,
    format: OutputFormat,
) -> Result<String, HabitError> {
    match cmd {
        HabitCommands::List { category, active } => {
            let filter = HabitFilter {
                category: category.as_deref().map(Category::parse).transpose()?,
                active,
            };
            let habits = ctx.store.list_with_status(filter, ctx.today)?;
            format_habits(&habits, "Habits", format)
        },
        HabitCommands::Show { id } => {
            let habit = ctx.store.require(id)?;
            let recent = ctx.store.recent_completions(id, RECENT_COMPLETIONS)?;
            format_habit(&habit, &recent, format)
        },
        HabitCommands::Add(args) => add(ctx, args, format),
        HabitCommands::Edit(args) => edit(ctx, args, format),
        HabitCommands::Archive { id } => set_active(ctx, id, false, format),
        HabitCommands::Restore { id } => set_active(ctx, id, true, format),
        HabitCommands::Delete { id } => {
            let habit = ctx.store.require(id)?;
            ctx.store.delete(id)?;
            match format {
                OutputFormat::Json => crate::output::to_json(&serde_json::json!({
                    "deleted": habit.id,
                    "name": habit.name,
                })),
                OutputFormat::Pretty => Ok(format!("Deleted habit {} ({})", habit.id, habit.name)),
            }
        },
    }
}

fn add(ctx: &Context, args: AddHabitArgs, format: OutputFormat) -> Result<String, HabitError> {
    let defaults = &ctx.config.habits;
    let mut new = NewHabit::new(args.name, Category::parse(&args.category)?);
    new.description = args.description;
    new.color = args.color.unwrap_or_else(|| defaults.default_color.clone());
    new.icon = args.icon.unwrap_or_else(|| defaults.default_icon.clone());
    new.unit = args.unit.unwrap_or_else(|| defaults.default_unit.clone());
    new.frequency = Frequency::parse(&args.frequency)?;
    new.target_count = args.target;
    new.reminder = Reminder {
        enabled: args.reminder.is_some(),
        time: args.reminder,
        message: args.reminder_message,
    };

    let habit = ctx.store.create(new, ctx.now)?;
    let status = HabitStatus {
        habit,
        completed_today: false,
        today_completed_count: 0,
    };
    format_habits(&[status], "Added", format)
}

fn edit(ctx: &Context, args: EditHabitArgs, format: OutputFormat) -> Result<String, HabitError> {
    let current = ctx.store.require(args.id)?;

    let reminder = if args.no_reminder {
        Some(Reminder {
            enabled: false,
            ..current.reminder.clone()
        })
    } else if args.reminder.is_some() || args.reminder_message.is_some() {
        Some(Reminder {
            enabled: true,
            time: args.reminder.or_else(|| current.reminder.time.clone()),
            message: args
                .reminder_message
                .or_else(|| current.reminder.message.clone()),
        })
    } else {
        None
    };

    let update = HabitUpdate {
        name: args.name,
        description: args.description,
        category: args.category.as_deref().map(Category::parse).transpose()?,
        color: args.color,
        icon: args.icon,
        frequency: args.frequency.as_deref().map(Frequency::parse).transpose()?,
        target_count: args.target,
        unit: args.unit,
        reminder,
        is_active: None,
    };

    if update.is_empty() {
        warn!(id = args.id, "edit has nothing to change");
    }

    let habit = ctx.store.update(args.id, &update, ctx.now)?;
    let recent = ctx.store.recent_completions(habit.id, RECENT_COMPLETIONS)?;
    format_habit(&habit, &recent, format)
}

fn set_active(
    ctx: &Context,
    id: i64,
    active: bool,
    format: OutputFormat,
) -> Result<String, HabitError> {
    let update = HabitUpdate {
        is_active: Some(active),
        ..Default::default()
    };
    let habit = ctx.store.update(id, &update, ctx.now)?;
    match format {
        OutputFormat::Json => crate::output::to_json(&habit),
        OutputFormat::Pretty => {
            let verb = if active { "Restored" } else { "Archived" };
            Ok(format!("{verb} habit {} ({})", habit.id, habit.name))
        },
    }
}
