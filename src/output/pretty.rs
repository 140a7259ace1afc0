use colored::Colorize;

use crate::features::habits::{Completion, CompletionWithHabit, Habit, HabitStatus};

/// Format habits as a checklist for the current day
pub fn format_habits_pretty(habits: &[HabitStatus], title: &str) -> String {
    if habits.is_empty() {
        return format!("{title} (0 habits)\n  No habits");
    }

    let done = habits.iter().filter(|h| h.completed_today).count();
    let mut output = format!("{title} ({done}/{} done)\n", habits.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for status in habits {
        let habit = &status.habit;
        let check = if status.completed_today {
            "[x]".green()
        } else {
            "[ ]".white()
        };

        let mut line = format!(
            "{} {} {} {}",
            check,
            format!("{:>3}", habit.id).dimmed(),
            habit.icon,
            habit.name.bold()
        );

        if habit.target_count > 1 {
            line.push_str(&format!(
                "  {}/{} {}",
                status.today_completed_count, habit.target_count, habit.unit
            ));
        }

        line.push_str(&format!("  {}", habit.category.to_string().dimmed()));

        if habit.current_streak > 0 {
            line.push_str(&format!(
                "  {}",
                format!("🔥 {}", habit.current_streak).yellow()
            ));
        }

        if !habit.is_active {
            line.push_str(&format!("  {}", "archived".red()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single habit with its recent completions
pub fn format_habit_pretty(habit: &Habit, recent: &[Completion]) -> String {
    let mut output = format!("{} {}\n", habit.icon, habit.name.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), habit.id));

    if let Some(description) = &habit.description {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), description));
    }

    output.push_str(&format!("  {}: {}\n", "Category".dimmed(), habit.category));
    output.push_str(&format!(
        "  {}: {}\n",
        "Frequency".dimmed(),
        habit.frequency.describe()
    ));
    output.push_str(&format!(
        "  {}: {} {} per day\n",
        "Target".dimmed(),
        habit.target_count,
        habit.unit
    ));
    output.push_str(&format!("  {}: {}\n", "Color".dimmed(), habit.color));

    if habit.reminder.enabled {
        let time = habit.reminder.time.as_deref().unwrap_or("-");
        let mut reminder = time.to_string();
        if let Some(message) = &habit.reminder.message {
            reminder.push_str(&format!(" ({message})"));
        }
        output.push_str(&format!("  {}: {}\n", "Reminder".dimmed(), reminder));
    }

    let state = if habit.is_active {
        "active".green()
    } else {
        "archived".red()
    };
    output.push_str(&format!("  {}: {}\n", "Status".dimmed(), state));

    output.push_str(&format!(
        "  {}: current {}  longest {}  total {}\n",
        "Streak".dimmed(),
        habit.current_streak.to_string().yellow(),
        habit.longest_streak,
        habit.total_completions
    ));

    if let Some(last) = habit.last_completed_date {
        output.push_str(&format!("  {}: {}\n", "Last done".dimmed(), last));
    }

    output.push_str(&format!(
        "  {}: {}\n",
        "Created".dimmed(),
        habit.created_at.format("%Y-%m-%d %H:%M")
    ));

    if !recent.is_empty() {
        output.push_str(&format!("\n  {}:\n", "Recent".dimmed()));
        for entry in recent {
            output.push_str(&format!("    {}\n", completion_line(entry)));
        }
    }

    output
}

/// Format the result of marking or unmarking a habit
pub fn format_completion_pretty(habit: &Habit, entry: &Completion) -> String {
    let verb = if entry.completed {
        "Done".green()
    } else {
        "Undone".yellow()
    };

    let mut output = format!(
        "{} {} {} on {}",
        verb,
        habit.icon,
        habit.name.bold(),
        entry.date
    );

    if entry.completed && habit.target_count > 1 {
        output.push_str(&format!(
            " ({}/{} {})",
            entry.completed_count, habit.target_count, habit.unit
        ));
    }

    output.push_str(&format!(
        "\n  {}: current {}  longest {}",
        "Streak".dimmed(),
        habit.current_streak.to_string().yellow(),
        habit.longest_streak
    ));

    output
}

/// Format completion history
pub fn format_history_pretty(entries: &[CompletionWithHabit]) -> String {
    if entries.is_empty() {
        return "History (0 entries)\n  No completions".to_string();
    }

    let mut output = format!("History ({} entries)\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        output.push_str(&format!(
            "{}  {}\n",
            completion_line(&entry.completion),
            entry.habit_name.bold()
        ));
    }

    output
}

fn completion_line(entry: &Completion) -> String {
    let check = if entry.completed {
        "[x]".green()
    } else {
        "[ ]".white()
    };

    let mut line = format!("{} {}", check, entry.date.to_string().cyan());

    if entry.completed {
        line.push_str(&format!("  x{}", entry.completed_count));
        line.push_str(&format!("  {}", entry.mood.to_string().dimmed()));
    }

    if let Some(minutes) = entry.time_spent {
        line.push_str(&format!("  {minutes}m"));
    }

    if let Some(notes) = &entry.notes {
        line.push_str(&format!("  {}", notes.italic()));
    }

    line
}
