//! Statistics module.
//!
//! Provides habit statistics and their terminal rendering:
//! - Streak, completion-rate, weekly and calendar computations
//! - Reports over a completion source
//! - Charts for pretty output

mod engine;
mod report;
mod source;
pub mod visualization;

pub use engine::{
    compute_calendar_aggregate, compute_completion_rate, compute_current_streak,
    compute_longest_streak, compute_weekly_progress, percentage, CalendarDay, CompletionRecord,
    DayProgress, StreakResult,
};
pub use report::{CalendarReport, HabitStats, OverallStats, StatsReporter, WeeklyReport};
pub use source::{CompletionSource, Scope};
pub use visualization::{
    render_bar_chart, render_heatmap, render_progress_bar, render_sparkline, render_summary_box,
};
