//! Statistics reports.
//!
//! Builds summary, per-habit, weekly and calendar reports from any
//! [`CompletionSource`], feeding the same record set through the streak engine
//! so every view agrees on what a streak is.

use chrono::{Days, NaiveDate, TimeDelta};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::engine::{
    compute_calendar_aggregate, compute_current_streak, compute_longest_streak,
    compute_weekly_progress, percentage, CalendarDay, CompletionRecord, DayProgress,
    StreakResult,
};
use super::source::{CompletionSource, Scope};
use crate::core::{days_before, week_start_sunday};
use crate::error::HabitError;
use crate::features::habits::{Completion, Habit};

/// Overall statistics across every habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    /// First day of the rate window.
    pub start: NaiveDate,
    /// Last day of the rate window.
    pub end: NaiveDate,
    /// Active habits.
    pub total_habits: usize,
    /// Distinct habits completed today.
    pub completed_today: usize,
    /// Completed entries in the window.
    pub total_completions: usize,
    /// Entries of any outcome in the window.
    pub total_attempts: usize,
    /// Consecutive days on which any habit was completed.
    pub current_streak: usize,
    /// Longest streak of any single habit.
    pub longest_streak: usize,
    /// Rounded percentage of attempts that were completed.
    pub completion_rate: u32,
    /// Mean mood score (1-5) of completed entries, 0 when none.
    pub average_mood: f64,
    /// Mean difficulty (1-5) of completed entries, 0 when none.
    pub average_difficulty: f64,
    /// Completed entries per day across the window, oldest first.
    pub daily_completions: Vec<usize>,
}

/// Statistics for a single habit.
#[derive(Debug, Clone, Serialize)]
pub struct HabitStats {
    /// The habit.
    pub habit: Habit,
    /// First day of the rate window.
    pub start: NaiveDate,
    /// Last day of the rate window.
    pub end: NaiveDate,
    /// Entries of any outcome in the window.
    pub total_days: usize,
    /// Completed entries in the window.
    pub completed_days: usize,
    /// Rounded percentage of entries that were completed.
    pub completion_rate: u32,
    /// Consecutive completed days up to today; a missing entry today does not break it.
    pub current_streak: usize,
    /// Longest run of consecutive completed days ever.
    pub longest_streak: usize,
    /// Completed days ever.
    pub total_completions: usize,
    /// Entries in the window, oldest first.
    pub completions: Vec<Completion>,
}

/// Seven days of progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    /// First day shown.
    pub start: NaiveDate,
    /// Last day shown.
    pub end: NaiveDate,
    /// One entry per day, oldest first.
    pub days: Vec<DayProgress>,
}

/// Per-day completion calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarReport {
    /// First day covered.
    pub start: NaiveDate,
    /// Last day covered.
    pub end: NaiveDate,
    /// Days that have at least one entry, oldest first.
    pub days: Vec<CalendarDay>,
}

/// Builds reports from a completion source.
pub struct StatsReporter<'a, S: CompletionSource> {
    source: &'a S,
    lookback_days: u32,
}

impl<'a, S: CompletionSource> StatsReporter<'a, S> {
    /// Create a reporter that walks current streaks at most `lookback_days` back.
    #[must_use]
    pub const fn new(source: &'a S, lookback_days: u32) -> Self {
        Self {
            source,
            lookback_days,
        }
    }

    /// Summary over the `days` days before `today`, plus today.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the window reaches past the earliest
    /// representable day, or an error if the source fails.
    pub fn overall(&self, today: NaiveDate, days: u32) -> Result<OverallStats, HabitError> {
        let start = window_start(today, days)?;
        let total_habits = self.source.habits(true)?.len();

        // Longest streaks need the full history of every habit.
        let history = self.source.completions(Scope::All, NaiveDate::MIN, today)?;
        let records: Vec<CompletionRecord> = history.iter().map(Completion::record).collect();

        let window: Vec<&Completion> = history.iter().filter(|c| c.date >= start).collect();
        let completed: Vec<&&Completion> = window.iter().filter(|c| c.completed).collect();

        let completed_today: BTreeSet<i64> = completed
            .iter()
            .filter(|c| c.date == today)
            .map(|c| c.habit_id)
            .collect();

        let mut by_habit: BTreeMap<i64, Vec<CompletionRecord>> = BTreeMap::new();
        for record in &records {
            by_habit.entry(record.habit_id).or_default().push(*record);
        }
        let longest_streak = by_habit
            .values()
            .map(|r| compute_longest_streak(r))
            .max()
            .unwrap_or(0);

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for entry in &completed {
            *per_day.entry(entry.date).or_default() += 1;
        }
        let daily_completions = day_range(start, today)
            .map(|d| per_day.get(&d).copied().unwrap_or(0))
            .collect();

        let stats = OverallStats {
            start,
            end: today,
            total_habits,
            completed_today: completed_today.len(),
            total_completions: completed.len(),
            total_attempts: window.len(),
            current_streak: compute_current_streak(&records, today, self.lookback_days),
            longest_streak,
            completion_rate: percentage(completed.len(), window.len()),
            average_mood: mean(completed.iter().map(|c| f64::from(c.mood.score()))),
            average_difficulty: mean(completed.iter().map(|c| f64::from(c.difficulty))),
            daily_completions,
        };

        debug!(
            habits = stats.total_habits,
            completions = stats.total_completions,
            streak = stats.current_streak,
            "computed overall stats"
        );
        Ok(stats)
    }

    /// Statistics for one habit over the `days` days before `today`, plus today.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::NotFound` if the habit does not exist, or
    /// `HabitError::Validation` if the window is out of range.
    pub fn habit(
        &self,
        habit_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<HabitStats, HabitError> {
        let habit = self
            .source
            .habits(false)?
            .into_iter()
            .find(|h| h.id == habit_id)
            .ok_or_else(|| HabitError::habit_not_found(habit_id))?;

        let start = window_start(today, days)?;
        let history = self
            .source
            .completions(Scope::Habit(habit_id), NaiveDate::MIN, today)?;
        let records: Vec<CompletionRecord> = history.iter().map(Completion::record).collect();
        let streaks = StreakResult::calculate(&records, today, start, self.lookback_days);

        Ok(HabitStats {
            habit,
            start,
            end: today,
            total_days: streaks.total_attempts,
            completed_days: streaks.total_completions,
            completion_rate: streaks.completion_rate,
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
            total_completions: records.iter().filter(|r| r.completed).count(),
            completions: history.into_iter().filter(|c| c.date >= start).collect(),
        })
    }

    /// Weekly progress.
    ///
    /// Without an offset this is the seven days ending today. With an offset
    /// it is the Sunday-to-Saturday week containing today, shifted by
    /// `offset` weeks.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the offset leaves the representable
    /// calendar, or an error if the source fails.
    pub fn weekly(&self, today: NaiveDate, offset: Option<i64>) -> Result<WeeklyReport, HabitError> {
        let start = match offset {
            None => days_before(today, 6),
            Some(weeks) => TimeDelta::try_weeks(weeks)
                .and_then(|shift| week_start_sunday(today).checked_add_signed(shift)),
        };
        let range = start.and_then(|s| Some((s, s.checked_add_days(Days::new(6))?)));
        let Some((start, end)) = range else {
            return Err(HabitError::Validation(format!(
                "week offset {} is out of range",
                offset.unwrap_or_default()
            )));
        };

        let habits_count = self.source.habits(true)?.len();
        let records: Vec<CompletionRecord> = self
            .source
            .completions(Scope::All, start, end)?
            .iter()
            .map(Completion::record)
            .collect();

        Ok(WeeklyReport {
            start,
            end,
            days: compute_weekly_progress(&records, habits_count, start),
        })
    }

    /// Calendar of the `days` days before `today`, plus today.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the window is out of range, or an
    /// error if the source fails.
    pub fn calendar(&self, today: NaiveDate, days: u32) -> Result<CalendarReport, HabitError> {
        let start = window_start(today, days)?;
        let records: Vec<CompletionRecord> = self
            .source
            .completions(Scope::All, start, today)?
            .iter()
            .map(Completion::record)
            .collect();

        Ok(CalendarReport {
            start,
            end: today,
            days: compute_calendar_aggregate(&records, start, today),
        })
    }
}

fn window_start(today: NaiveDate, days: u32) -> Result<NaiveDate, HabitError> {
    days_before(today, days)
        .ok_or_else(|| HabitError::Validation(format!("{days} days is too far back")))
}

fn day_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::habits::{Category, Frequency, Mood, Reminder};
    use crate::features::stats::source::MockCompletionSource;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn habit(id: i64) -> Habit {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Habit {
            id,
            name: format!("Habit {id}"),
            description: None,
            category: Category::Health,
            color: "#3B82F6".to_string(),
            icon: "🎯".to_string(),
            frequency: Frequency::Daily,
            target_count: 1,
            unit: "times".to_string(),
            is_active: true,
            reminder: Reminder::default(),
            created_at: ts,
            updated_at: ts,
            total_completions: 0,
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
        }
    }

    fn entry(habit_id: i64, d: u32, completed: bool, mood: Mood, difficulty: u8) -> Completion {
        let ts = Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap();
        Completion {
            id: i64::from(d) * 10 + habit_id,
            habit_id,
            date: day(d),
            completed,
            completed_count: u32::from(completed),
            notes: None,
            mood,
            difficulty,
            time_spent: None,
            completed_at: completed.then_some(ts),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn done(habit_id: i64, d: u32) -> Completion {
        entry(habit_id, d, true, Mood::Neutral, 3)
    }

    /// A mock that filters a fixed entry list by scope and range.
    fn mock_with(habits: Vec<Habit>, entries: Vec<Completion>) -> MockCompletionSource {
        let mut mock = MockCompletionSource::new();
        mock.expect_habits()
            .returning(move |active_only| {
                Ok(habits
                    .iter()
                    .filter(|h| !active_only || h.is_active)
                    .cloned()
                    .collect())
            });
        mock.expect_completions().returning(move |scope, start, end| {
            Ok(entries
                .iter()
                .filter(|c| c.date >= start && c.date <= end)
                .filter(|c| scope.habit_id().map_or(true, |id| c.habit_id == id))
                .cloned()
                .collect())
        });
        mock
    }

    #[test]
    fn test_overall_empty() {
        let mock = mock_with(vec![], vec![]);
        let stats = StatsReporter::new(&mock, 365).overall(day(10), 7).unwrap();

        assert_eq!(stats.total_habits, 0);
        assert_eq!(stats.total_completions, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.current_streak, 0);
        assert!(stats.average_mood.abs() < f64::EPSILON);
        assert_eq!(stats.daily_completions.len(), 8);
    }

    #[test]
    fn test_overall_pools_habits() {
        let mock = mock_with(
            vec![habit(1), habit(2)],
            vec![
                done(1, 7),
                done(2, 8),
                entry(1, 9, true, Mood::Excellent, 1),
                entry(2, 9, false, Mood::Neutral, 3),
                entry(2, 10, true, Mood::Struggled, 5),
            ],
        );
        let stats = StatsReporter::new(&mock, 365).overall(day(10), 30).unwrap();

        assert_eq!(stats.total_habits, 2);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.total_completions, 4);
        assert_eq!(stats.total_attempts, 5);
        assert_eq!(stats.completion_rate, 80);
        // 7, 8, 9, 10 each have a completion from some habit.
        assert_eq!(stats.current_streak, 4);
        // Per habit: habit 1 has 7 and 9, habit 2 has 8 and 10.
        assert_eq!(stats.longest_streak, 1);
        // Moods 3, 3, 5, 1.
        assert!((stats.average_mood - 3.0).abs() < f64::EPSILON);
        // Difficulties 3, 3, 1, 5.
        assert!((stats.average_difficulty - 3.0).abs() < f64::EPSILON);
        assert_eq!(*stats.daily_completions.last().unwrap(), 1);
    }

    #[test]
    fn test_overall_window_excludes_older_entries() {
        let mock = mock_with(vec![habit(1)], vec![done(1, 1), done(1, 2), done(1, 9)]);
        let stats = StatsReporter::new(&mock, 365).overall(day(10), 3).unwrap();

        assert_eq!(stats.start, day(7));
        assert_eq!(stats.total_completions, 1);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.daily_completions, vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_habit_stats() {
        let mock = mock_with(
            vec![habit(1), habit(2)],
            vec![
                done(1, 1),
                done(1, 2),
                done(1, 3),
                done(1, 8),
                entry(1, 9, false, Mood::Neutral, 3),
                done(2, 9),
            ],
        );
        let stats = StatsReporter::new(&mock, 365).habit(1, day(10), 2).unwrap();

        assert_eq!(stats.habit.id, 1);
        assert_eq!(stats.total_days, 2);
        assert_eq!(stats.completed_days, 1);
        assert_eq!(stats.completion_rate, 50);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_completions, 4);
        assert_eq!(stats.completions.len(), 2);
    }

    #[test]
    fn test_habit_stats_unknown() {
        let mock = mock_with(vec![habit(1)], vec![]);
        let result = StatsReporter::new(&mock, 365).habit(9, day(10), 30);
        assert!(matches!(result, Err(HabitError::NotFound(_))));
    }

    #[test]
    fn test_weekly_rolling() {
        let mock = mock_with(vec![habit(1), habit(2)], vec![done(1, 4), done(2, 4), done(1, 10)]);
        let report = StatsReporter::new(&mock, 365).weekly(day(10), None).unwrap();

        assert_eq!(report.start, day(4));
        assert_eq!(report.end, day(10));
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[0].completed, 2);
        assert_eq!(report.days[0].completion_rate, 100);
        assert_eq!(report.days[6].completed, 1);
        assert_eq!(report.days[6].total, 2);
    }

    #[test]
    fn test_weekly_calendar_offset() {
        // 2024-01-10 is a Wednesday; its week starts Sunday 2024-01-07.
        let mock = mock_with(vec![habit(1)], vec![done(1, 2)]);
        let reporter = StatsReporter::new(&mock, 365);

        let current = reporter.weekly(day(10), Some(0)).unwrap();
        assert_eq!(current.start, day(7));
        assert_eq!(current.days[0].day_name, "Sun");

        let previous = reporter.weekly(day(10), Some(-1)).unwrap();
        assert_eq!(previous.start, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(previous.end, day(6));
        assert_eq!(previous.days[2].completed, 1);
    }

    #[test]
    fn test_calendar() {
        let mock = mock_with(
            vec![habit(1), habit(2)],
            vec![done(1, 1), done(1, 5), entry(2, 5, false, Mood::Neutral, 3)],
        );
        let report = StatsReporter::new(&mock, 365).calendar(day(10), 7).unwrap();

        assert_eq!(report.start, day(3));
        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[0].date, day(5));
        assert_eq!(report.days[0].total, 2);
        assert_eq!(report.days[0].completion_rate, 50);
    }

    #[test]
    fn test_completed_today_counts_distinct_habits() {
        let mock = mock_with(vec![habit(1), habit(2)], vec![done(1, 10), done(2, 10), done(1, 10)]);
        let stats = StatsReporter::new(&mock, 365).overall(day(10), 7).unwrap();
        assert_eq!(stats.completed_today, 2);
    }

    #[test]
    fn test_out_of_range_windows_are_rejected() {
        let mock = mock_with(vec![habit(1)], vec![done(1, 10)]);
        let reporter = StatsReporter::new(&mock, 365);

        assert!(matches!(
            reporter.overall(day(10), 100_000_000),
            Err(HabitError::Validation(_))
        ));
        assert!(matches!(
            reporter.habit(1, day(10), u32::MAX),
            Err(HabitError::Validation(_))
        ));
        assert!(matches!(
            reporter.calendar(day(10), 100_000_000),
            Err(HabitError::Validation(_))
        ));
        assert!(matches!(
            reporter.weekly(day(10), Some(100_000_000)),
            Err(HabitError::Validation(_))
        ));
        assert!(matches!(
            reporter.weekly(day(10), Some(i64::MIN)),
            Err(HabitError::Validation(_))
        ));
    }
}
