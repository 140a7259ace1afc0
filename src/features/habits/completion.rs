//! Daily completion entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HabitError;
use crate::features::stats::CompletionRecord;

/// How a completion felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excellent,
    Good,
    #[default]
    Neutral,
    Difficult,
    Struggled,
}

impl Mood {
    /// Numeric score from 5 (excellent) down to 1 (struggled).
    #[must_use]
    pub const fn score(&self) -> u8 {
        match self {
            Self::Excellent => 5,
            Self::Good => 4,
            Self::Neutral => 3,
            Self::Difficult => 2,
            Self::Struggled => 1,
        }
    }

    /// Stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Difficult => "difficult",
            Self::Struggled => "struggled",
        }
    }

    /// Parse a stored or user-supplied mood.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` for unknown moods.
    pub fn parse(s: &str) -> Result<Self, HabitError> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "neutral" => Ok(Self::Neutral),
            "difficult" => Ok(Self::Difficult),
            "struggled" => Ok(Self::Struggled),
            other => Err(HabitError::Validation(format!("unknown mood '{other}'"))),
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default difficulty on the 1-5 scale.
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// A stored completion entry for one habit on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
    pub completed_count: u32,
    pub notes: Option<String>,
    pub mood: Mood,
    pub difficulty: u8,
    /// Minutes spent.
    pub time_spent: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Completion {
    /// The engine's view of this entry.
    #[must_use]
    pub const fn record(&self) -> CompletionRecord {
        CompletionRecord {
            habit_id: self.habit_id,
            date: self.date,
            completed: self.completed,
            completed_count: self.completed_count,
        }
    }
}

/// A completion entry joined with its habit's name, for history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionWithHabit {
    #[serde(flatten)]
    pub completion: Completion,
    pub habit_name: String,
}

/// Request to mark a habit done for a day.
#[derive(Debug, Clone)]
pub struct CompleteRequest {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed_count: u32,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub difficulty: Option<u8>,
    pub time_spent: Option<u32>,
}

impl CompleteRequest {
    /// Mark `habit_id` done once on `date`.
    #[must_use]
    pub const fn new(habit_id: i64, date: NaiveDate) -> Self {
        Self {
            habit_id,
            date,
            completed_count: 1,
            notes: None,
            mood: None,
            difficulty: None,
            time_spent: None,
        }
    }

    /// Check the request against `today`.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` for future dates, a zero count, or a
    /// difficulty outside 1-5.
    pub fn validate(&self, today: NaiveDate) -> Result<(), HabitError> {
        if self.date > today {
            return Err(HabitError::Validation(format!(
                "cannot complete a habit for a future date ({})",
                self.date
            )));
        }
        if self.completed_count == 0 {
            return Err(HabitError::Validation(
                "completed count must be at least 1".to_string(),
            ));
        }
        if let Some(d) = self.difficulty {
            if !(1..=5).contains(&d) {
                return Err(HabitError::Validation(format!(
                    "difficulty must be between 1 and 5, got {d}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_mood_parse_and_score() {
        assert_eq!(Mood::parse("Excellent").unwrap(), Mood::Excellent);
        assert_eq!(Mood::parse("struggled").unwrap().score(), 1);
        assert_eq!(Mood::default().score(), 3);
        assert!(Mood::parse("meh").is_err());
    }

    #[test]
    fn test_request_validation() {
        let today = day(10);
        assert!(CompleteRequest::new(1, day(10)).validate(today).is_ok());
        assert!(CompleteRequest::new(1, day(2)).validate(today).is_ok());
        assert!(CompleteRequest::new(1, day(11)).validate(today).is_err());

        let mut req = CompleteRequest::new(1, day(10));
        req.difficulty = Some(6);
        assert!(req.validate(today).is_err());

        let mut req = CompleteRequest::new(1, day(10));
        req.completed_count = 0;
        assert!(req.validate(today).is_err());
    }
}
