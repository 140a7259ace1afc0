//! Streak and completion-rate calculations.
//!
//! Every function here is pure: it takes plain completion records plus a
//! caller-supplied "today" and returns plain results. Nothing reads the clock
//! or the database.
//!
//! # Preconditions
//!
//! Records are expected to be normalized to calendar days and to hold at most
//! one entry per (habit, day). The store enforces that uniqueness; these
//! functions do not check it.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One habit's outcome for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Habit this record belongs to.
    pub habit_id: i64,
    /// Calendar day of the record.
    pub date: NaiveDate,
    /// Whether the habit was performed that day.
    pub completed: bool,
    /// How many times it was performed (for targets above 1).
    pub completed_count: u32,
}

impl CompletionRecord {
    /// A completed record with a count of 1.
    #[must_use]
    pub const fn done(habit_id: i64, date: NaiveDate) -> Self {
        Self {
            habit_id,
            date,
            completed: true,
            completed_count: 1,
        }
    }

    /// An attempted-but-missed record.
    #[must_use]
    pub const fn missed(habit_id: i64, date: NaiveDate) -> Self {
        Self {
            habit_id,
            date,
            completed: false,
            completed_count: 0,
        }
    }
}

/// Streak and rate summary for a habit or for all habits pooled per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Consecutive completed days ending today.
    pub current_streak: usize,
    /// Longest run of consecutive completed days in the full history.
    pub longest_streak: usize,
    /// Completed records inside the window.
    pub total_completions: usize,
    /// Records of any outcome inside the window.
    pub total_attempts: usize,
    /// Rounded percentage of attempts that were completed.
    pub completion_rate: u32,
}

impl StreakResult {
    /// Compute every streak metric in one pass over the same record set.
    ///
    /// The rate window runs from `window_start` through `today`.
    #[must_use]
    pub fn calculate(
        records: &[CompletionRecord],
        today: NaiveDate,
        window_start: NaiveDate,
        max_lookback_days: u32,
    ) -> Self {
        let (total_completions, total_attempts) = window_counts(records, window_start, today);

        Self {
            current_streak: compute_current_streak(records, today, max_lookback_days),
            longest_streak: compute_longest_streak(records),
            total_completions,
            total_attempts,
            completion_rate: percentage(total_completions, total_attempts),
        }
    }
}

/// One day of a weekly progress chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    /// Calendar day.
    pub date: NaiveDate,
    /// Short weekday name ("Mon", "Tue", ...).
    pub day_name: String,
    /// Distinct habits completed that day.
    pub completed: usize,
    /// Habits that could have been completed.
    pub total: usize,
    /// Rounded `completed / total` percentage.
    pub completion_rate: u32,
}

/// One day of the completion calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Calendar day.
    pub date: NaiveDate,
    /// Records of any outcome that day.
    pub total: usize,
    /// Completed records that day.
    pub completed: usize,
    /// Rounded `completed / total` percentage.
    pub completion_rate: u32,
}

/// Count consecutive completed days walking backward from `today`.
///
/// Today is still in progress, so a missing completion today neither breaks
/// nor extends the streak. The first past day without a completion ends the
/// walk. At most `max_lookback_days` past days are examined.
#[must_use]
pub fn compute_current_streak(
    records: &[CompletionRecord],
    today: NaiveDate,
    max_lookback_days: u32,
) -> usize {
    let completed_days = completed_dates(records);
    let mut streak = 0;

    for offset in 0..=u64::from(max_lookback_days) {
        let Some(day) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };

        if completed_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

/// Longest run of consecutive completed days.
///
/// Missed records play no part: only gaps between completed days matter.
#[must_use]
pub fn compute_longest_streak(records: &[CompletionRecord]) -> usize {
    let mut dates: Vec<NaiveDate> = completed_dates(records).into_iter().collect();
    dates.sort_unstable();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        run = match prev {
            Some(p) if (date - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    longest
}

/// Completion rate over the inclusive `[window_start, window_end]` range.
#[must_use]
pub fn compute_completion_rate(
    records: &[CompletionRecord],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> u32 {
    let (completed, attempts) = window_counts(records, window_start, window_end);
    percentage(completed, attempts)
}

/// Seven days of progress starting at `week_start`.
#[must_use]
pub fn compute_weekly_progress(
    records: &[CompletionRecord],
    habits_count: usize,
    week_start: NaiveDate,
) -> Vec<DayProgress> {
    let done: HashSet<(i64, NaiveDate)> = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| (r.habit_id, r.date))
        .collect();

    (0..7)
        .filter_map(|i| week_start.checked_add_days(Days::new(i)))
        .map(|date| {
            let completed = done.iter().filter(|(_, d)| *d == date).count();

            DayProgress {
                date,
                day_name: date.format("%a").to_string(),
                completed,
                total: habits_count,
                completion_rate: percentage(completed, habits_count),
            }
        })
        .collect()
}

/// Per-day totals for every day in `[start, end]` that has records.
#[must_use]
pub fn compute_calendar_aggregate(
    records: &[CompletionRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CalendarDay> {
    let mut by_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for record in records.iter().filter(|r| r.date >= start && r.date <= end) {
        let entry = by_day.entry(record.date).or_default();
        entry.0 += 1;
        if record.completed {
            entry.1 += 1;
        }
    }

    by_day
        .into_iter()
        .map(|(date, (total, completed))| CalendarDay {
            date,
            total,
            completed,
            completion_rate: percentage(completed, total),
        })
        .collect()
}

/// Rounded percentage, 0 when the denominator is 0.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn completed_dates(records: &[CompletionRecord]) -> HashSet<NaiveDate> {
    records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.date)
        .collect()
}

fn window_counts(
    records: &[CompletionRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> (usize, usize) {
    records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .fold((0, 0), |(completed, attempts), r| {
            (completed + usize::from(r.completed), attempts + 1)
        })
}
