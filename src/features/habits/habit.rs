//! Habit definitions.
//!
//! A habit carries its schedule, target, and a cached copy of its streak
//! statistics. The cache is rewritten from the streak engine after every
//! completion change and is never the source of truth.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::HabitError;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$")
        .unwrap_or_else(|e| panic!("Invalid color regex: {e}"))
});

static REMINDER_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$")
        .unwrap_or_else(|e| panic!("Invalid reminder time regex: {e}"))
});

/// Default habit color.
pub const DEFAULT_COLOR: &str = "#3B82F6";
/// Default habit icon.
pub const DEFAULT_ICON: &str = "🎯";
/// Default unit for the target count.
pub const DEFAULT_UNIT: &str = "times";

/// Habit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Health,
    Fitness,
    Productivity,
    Learning,
    Mindfulness,
    Social,
    Creative,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 8] = [
        Self::Health,
        Self::Fitness,
        Self::Productivity,
        Self::Learning,
        Self::Mindfulness,
        Self::Social,
        Self::Creative,
        Self::Other,
    ];

    /// Stored and displayed name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Fitness => "Fitness",
            Self::Productivity => "Productivity",
            Self::Learning => "Learning",
            Self::Mindfulness => "Mindfulness",
            Self::Social => "Social",
            Self::Creative => "Creative",
            Self::Other => "Other",
        }
    }

    /// Parse a category name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` for unknown names.
    pub fn parse(s: &str) -> Result<Self, HabitError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                HabitError::Validation(format!(
                    "unknown category '{s}' (expected one of: {})",
                    Self::ALL.map(|c| c.as_str()).join(", ")
                ))
            })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a habit is meant to be performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    #[default]
    Daily,
    /// On specific weekdays.
    Weekly { days: Vec<Weekday> },
    /// On specific dates.
    Custom { dates: Vec<NaiveDate> },
}

impl Frequency {
    /// Parse a frequency from CLI input.
    ///
    /// Accepts `daily`, `weekly:mon,wed,fri`, or `custom:2024-01-01,2024-01-15`.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the kind or any element is invalid.
    pub fn parse(s: &str) -> Result<Self, HabitError> {
        let s = s.trim().to_lowercase();
        let (kind, rest) = s.split_once(':').unwrap_or((s.as_str(), ""));
        let items = rest.split(',').map(str::trim).filter(|p| !p.is_empty());

        match kind {
            "daily" => Ok(Self::Daily),
            "weekly" => {
                let days = items
                    .map(|d| {
                        d.parse::<Weekday>()
                            .map_err(|_| HabitError::Validation(format!("invalid weekday '{d}'")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if days.is_empty() {
                    return Err(HabitError::Validation(
                        "weekly frequency needs at least one weekday".to_string(),
                    ));
                }
                Ok(Self::Weekly { days })
            }
            "custom" => {
                let dates = items
                    .map(|d| {
                        NaiveDate::parse_from_str(d, "%Y-%m-%d")
                            .map_err(|_| HabitError::Validation(format!("invalid date '{d}'")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Custom { dates })
            }
            other => Err(HabitError::Validation(format!(
                "unknown frequency '{other}' (expected daily, weekly or custom)"
            ))),
        }
    }

    /// Short human description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Daily => "daily".to_string(),
            Self::Weekly { days } => format!(
                "weekly ({})",
                days.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            ),
            Self::Custom { dates } => format!("custom ({} dates)", dates.len()),
        }
    }
}

/// Reminder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reminder {
    /// Whether the reminder is on.
    pub enabled: bool,
    /// Time of day as `HH:MM`.
    pub time: Option<String>,
    /// Message to show.
    pub message: Option<String>,
}

/// A tracked habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub color: String,
    pub icon: String,
    pub frequency: Frequency,
    pub target_count: u32,
    pub unit: String,
    pub is_active: bool,
    pub reminder: Reminder,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Cached: all-time completed days.
    pub total_completions: usize,
    /// Cached: streak as of the last recomputation.
    pub current_streak: usize,
    /// Cached: longest streak.
    pub longest_streak: usize,
    /// Cached: most recent completed day.
    pub last_completed_date: Option<NaiveDate>,
}

/// A habit with its completion state for the current day.
#[derive(Debug, Clone, Serialize)]
pub struct HabitStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
    pub today_completed_count: u32,
}

/// Input for creating a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub color: String,
    pub icon: String,
    pub frequency: Frequency,
    pub target_count: u32,
    pub unit: String,
    pub reminder: Reminder,
}

impl NewHabit {
    /// A daily habit with default presentation.
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            description: None,
            category,
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            frequency: Frequency::Daily,
            target_count: 1,
            unit: DEFAULT_UNIT.to_string(),
            reminder: Reminder::default(),
        }
    }

    /// Trim text fields and check every constraint.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` describing the first violated rule.
    pub fn validated(mut self) -> Result<Self, HabitError> {
        self.name = validate_name(&self.name)?;
        self.description = trim_optional(self.description);
        validate_color(&self.color)?;
        validate_target(self.target_count)?;
        validate_reminder(&self.reminder)?;
        Ok(self)
    }
}

/// Partial update of a habit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub frequency: Option<Frequency>,
    pub target_count: Option<u32>,
    pub unit: Option<String>,
    pub reminder: Option<Reminder>,
    pub is_active: Option<bool>,
}

impl HabitUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.color.is_none()
            && self.icon.is_none()
            && self.frequency.is_none()
            && self.target_count.is_none()
            && self.unit.is_none()
            && self.reminder.is_none()
            && self.is_active.is_none()
    }

    /// Apply the update to a habit, validating each changed field.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if a new value is invalid. The habit is
    /// left untouched in that case.
    pub fn apply_to(&self, habit: &Habit) -> Result<Habit, HabitError> {
        let mut updated = habit.clone();

        if let Some(name) = &self.name {
            updated.name = validate_name(name)?;
        }
        if let Some(description) = &self.description {
            updated.description = trim_optional(Some(description.clone()));
        }
        if let Some(category) = self.category {
            updated.category = category;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
            updated.color.clone_from(color);
        }
        if let Some(icon) = &self.icon {
            updated.icon.clone_from(icon);
        }
        if let Some(frequency) = &self.frequency {
            updated.frequency = frequency.clone();
        }
        if let Some(target) = self.target_count {
            validate_target(target)?;
            updated.target_count = target;
        }
        if let Some(unit) = &self.unit {
            updated.unit.clone_from(unit);
        }
        if let Some(reminder) = &self.reminder {
            validate_reminder(reminder)?;
            updated.reminder = reminder.clone();
        }
        if let Some(active) = self.is_active {
            updated.is_active = active;
        }

        Ok(updated)
    }
}

fn validate_name(name: &str) -> Result<String, HabitError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HabitError::Validation("habit name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_color(color: &str) -> Result<(), HabitError> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(HabitError::Validation(format!(
            "color must be a valid hex color code, got '{color}'"
        )))
    }
}

fn validate_target(target: u32) -> Result<(), HabitError> {
    if target == 0 {
        return Err(HabitError::Validation(
            "target count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_reminder(reminder: &Reminder) -> Result<(), HabitError> {
    match &reminder.time {
        Some(time) if !REMINDER_TIME.is_match(time) => Err(HabitError::Validation(format!(
            "reminder time must be HH:MM, got '{time}'"
        ))),
        None if reminder.enabled => Err(HabitError::Validation(
            "an enabled reminder needs a time".to_string(),
        )),
        _ => Ok(()),
    }
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
