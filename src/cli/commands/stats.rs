//! Statistics command implementation.
//!
//! Handles the stats subcommands for habit analytics.

use colored::Colorize;

use super::Context;
use crate::cli::args::{OutputFormat, StatsCommands};
use crate::error::HabitError;
use crate::features::stats::{
    render_bar_chart, render_heatmap, render_progress_bar, render_sparkline, render_summary_box,
    CalendarReport, HabitStats, OverallStats, StatsReporter, WeeklyReport,
};
use crate::output::to_json;

/// Execute stats subcommands.
///
/// # Errors
///
/// Returns an error if storage fails or a habit is unknown.
pub fn stats(
    ctx: &Context,
    cmd: Option<StatsCommands>,
    format: OutputFormat,
) -> Result<String, HabitError> {
    let settings = &ctx.config.stats;
    let reporter = StatsReporter::new(&ctx.store, settings.streak_lookback_days);

    match cmd {
        None => render_summary(
            &reporter.overall(ctx.today, settings.default_period_days)?,
            format,
        ),
        Some(StatsCommands::Summary { days }) => render_summary(
            &reporter.overall(ctx.today, days.unwrap_or(settings.default_period_days))?,
            format,
        ),
        Some(StatsCommands::Habit { id, days }) => render_habit(
            &reporter.habit(id, ctx.today, days.unwrap_or(settings.default_period_days))?,
            format,
        ),
        Some(StatsCommands::Weekly { offset }) => {
            render_weekly(&reporter.weekly(ctx.today, offset)?, format)
        },
        Some(StatsCommands::Calendar { days }) => render_calendar(
            &reporter.calendar(ctx.today, days.unwrap_or(settings.calendar_days))?,
            format,
        ),
        Some(StatsCommands::Refresh) => {
            let habits = ctx.store.refresh_all(ctx.today)?;
            match format {
                OutputFormat::Json => to_json(&habits),
                OutputFormat::Pretty => Ok(format!("Refreshed {} habits", habits.len())),
            }
        },
    }
}

fn streak_text(days: usize) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Render the summary across all habits.
fn render_summary(stats: &OverallStats, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(stats),
        OutputFormat::Pretty => {
            let mut output = Vec::new();

            output.push(render_summary_box(
                &format!("📊 Habits {} to {}", stats.start.format("%b %d"), stats.end.format("%b %d")),
                &[
                    ("Active habits", stats.total_habits.to_string()),
                    (
                        "Done today",
                        format!("{}/{}", stats.completed_today, stats.total_habits),
                    ),
                    (
                        "Completions",
                        format!("{} of {}", stats.total_completions, stats.total_attempts),
                    ),
                    ("Completion rate", format!("{}%", stats.completion_rate)),
                    ("Current streak", streak_text(stats.current_streak)),
                    ("Longest streak", streak_text(stats.longest_streak)),
                    ("Average mood", format!("{:.1}/5", stats.average_mood)),
                    ("Average difficulty", format!("{:.1}/5", stats.average_difficulty)),
                ],
            ));
            output.push(String::new());

            output.push(format!(
                "  Today:  {}",
                render_progress_bar(stats.completed_today, stats.total_habits, 30)
            ));
            output.push(format!(
                "  Trend:  {}",
                render_sparkline(&stats.daily_completions).cyan()
            ));

            if stats.current_streak > 0 {
                output.push(String::new());
                output.push(
                    format!("🔥 {} and counting", streak_text(stats.current_streak))
                        .green()
                        .to_string(),
                );
            }

            Ok(output.join("\n"))
        },
    }
}

/// Render statistics for one habit.
fn render_habit(stats: &HabitStats, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(stats),
        OutputFormat::Pretty => {
            let habit = &stats.habit;
            let mut output = Vec::new();

            output.push(format!("{} {}", habit.icon, habit.name.bold()));
            output.push("─".repeat(50));
            output.push(format!(
                "  Window: {} to {}",
                stats.start, stats.end
            ));
            output.push(format!(
                "  Completed: {} of {} days  {}",
                stats.completed_days.to_string().green(),
                stats.total_days,
                render_progress_bar(stats.completed_days, stats.total_days, 20)
            ));
            output.push(format!(
                "  Current streak: {}  Longest: {}",
                streak_text(stats.current_streak).yellow(),
                streak_text(stats.longest_streak)
            ));
            output.push(format!("  All-time completions: {}", stats.total_completions));

            if !stats.completions.is_empty() {
                let marks: String = stats
                    .completions
                    .iter()
                    .map(|c| if c.completed { '█' } else { '·' })
                    .collect();
                output.push(format!("  Entries: {}", marks.green()));
            }

            Ok(output.join("\n"))
        },
    }
}

/// Render seven days of progress.
fn render_weekly(report: &WeeklyReport, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Pretty => {
            let mut output = Vec::new();

            output.push(
                format!(
                    "📅 WEEK {} to {}",
                    report.start.format("%b %d"),
                    report.end.format("%b %d")
                )
                .bold()
                .to_string(),
            );
            output.push("─".repeat(50));

            let data: Vec<(String, usize)> = report
                .days
                .iter()
                .map(|d| (format!("{} {}", d.day_name, d.date.format("%d")), d.completed))
                .collect();
            output.push(render_bar_chart(&data, 6, 30));
            output.push(String::new());

            for day in &report.days {
                output.push(format!(
                    "  {} {}/{}  {}%",
                    day.day_name,
                    day.completed,
                    day.total,
                    day.completion_rate
                ));
            }

            Ok(output.join("\n"))
        },
    }
}

/// Render the completion calendar.
fn render_calendar(report: &CalendarReport, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Pretty => {
            let active_days = report.days.iter().filter(|d| d.completed > 0).count();
            let mut output = Vec::new();

            output.push(
                format!(
                    "🗓  CALENDAR {} to {}",
                    report.start.format("%b %d"),
                    report.end.format("%b %d")
                )
                .bold()
                .to_string(),
            );
            output.push("─".repeat(50));
            output.push(render_heatmap(&report.days, report.start, report.end));
            output.push(String::new());
            output.push(format!(
                "  Days with a completion: {}",
                active_days.to_string().green()
            ));

            Ok(output.join("\n"))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::testing::context;
    use crate::features::habits::{Category, CompleteRequest, NewHabit};
    use chrono::Duration;

    fn seeded() -> Context {
        let mut ctx = context();
        let a = ctx
            .store
            .create(NewHabit::new("A", Category::Health), ctx.now)
            .unwrap();
        let b = ctx
            .store
            .create(NewHabit::new("B", Category::Learning), ctx.now)
            .unwrap();
        for back in 0..3 {
            let date = ctx.today - Duration::days(back);
            ctx.store
                .complete(&CompleteRequest::new(a.id, date), ctx.today, ctx.now)
                .unwrap();
        }
        ctx.store
            .complete(&CompleteRequest::new(b.id, ctx.today), ctx.today, ctx.now)
            .unwrap();
        ctx
    }

    #[test]
    fn test_summary_json() {
        let ctx = seeded();
        let output = stats(&ctx, None, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total_habits"], 2);
        assert_eq!(value["completed_today"], 2);
        assert_eq!(value["total_completions"], 4);
        assert_eq!(value["completion_rate"], 100);
        assert_eq!(value["current_streak"], 3);
        assert_eq!(value["longest_streak"], 3);
    }

    #[test]
    fn test_summary_pretty() {
        colored::control::set_override(false);
        let ctx = seeded();
        let output = stats(&ctx, Some(StatsCommands::Summary { days: Some(7) }), OutputFormat::Pretty)
            .unwrap();
        assert!(output.contains("Current streak"));
        assert!(output.contains("3 days"));
        assert!(output.contains("100%"));
    }

    #[test]
    fn test_habit_stats_json() {
        let ctx = seeded();
        let id = ctx.store.list(Default::default()).unwrap()[1].id;
        let output = stats(
            &ctx,
            Some(StatsCommands::Habit { id, days: None }),
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["habit"]["name"], "A");
        assert_eq!(value["completed_days"], 3);
        assert_eq!(value["current_streak"], 3);
    }

    #[test]
    fn test_weekly_and_calendar() {
        colored::control::set_override(false);
        let ctx = seeded();

        let weekly = stats(&ctx, Some(StatsCommands::Weekly { offset: None }), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&weekly).unwrap();
        assert_eq!(value["days"].as_array().unwrap().len(), 7);
        assert_eq!(value["days"][6]["completed"], 2);
        assert_eq!(value["days"][6]["completion_rate"], 100);

        let calendar = stats(&ctx, Some(StatsCommands::Calendar { days: Some(14) }), OutputFormat::Pretty)
            .unwrap();
        assert!(calendar.contains("Legend"));
        assert!(calendar.contains("Days with a completion: 3"));
    }

    #[test]
    fn test_refresh() {
        let ctx = seeded();
        let output = stats(&ctx, Some(StatsCommands::Refresh), OutputFormat::Pretty).unwrap();
        assert_eq!(output, "Refreshed 2 habits");
    }

    #[test]
    fn test_unknown_habit() {
        let ctx = context();
        assert!(matches!(
            stats(&ctx, Some(StatsCommands::Habit { id: 5, days: None }), OutputFormat::Json),
            Err(HabitError::NotFound(_))
        ));
    }
}
