//! Configuration settings for habitflow.
//!
//! Settings are loaded from `~/.habitflow/config.yaml`. Every field has a
//! default, so a partial file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::HabitError;
use crate::features::habits::{DEFAULT_COLOR, DEFAULT_ICON, DEFAULT_UNIT};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Defaults for new habits.
    pub habits: HabitsConfig,
    /// Statistics settings.
    pub stats: StatsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Output format used when `--output` is not given.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to the `colored` crate's global override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Defaults applied when a habit is created without explicit values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitsConfig {
    /// Hex color for new habits.
    pub default_color: String,
    /// Icon for new habits.
    pub default_icon: String,
    /// Unit label for new habits.
    pub default_unit: String,
}

/// Statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Window for completion rates when `--days` is not given.
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,
    /// How many past days a current-streak walk may examine.
    #[serde(default = "default_streak_lookback")]
    pub streak_lookback_days: u32,
    /// Days shown by the calendar view.
    #[serde(default = "default_calendar_days")]
    pub calendar_days: u32,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_period_days() -> u32 {
    30
}

const fn default_streak_lookback() -> u32 {
    365
}

const fn default_calendar_days() -> u32 {
    90
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_string(),
            default_icon: DEFAULT_ICON.to_string(),
            default_unit: DEFAULT_UNIT.to_string(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_period_days: default_period_days(),
            streak_lookback_days: default_streak_lookback(),
            calendar_days: default_calendar_days(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, HabitError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            HabitError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            HabitError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), HabitError> {
        let contents = self.to_yaml()?;

        std::fs::write(path, contents).map_err(|e| {
            HabitError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Render the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, HabitError> {
        serde_yaml::to_string(self)
            .map_err(|e| HabitError::Config(format!("Failed to serialize config: {e}")))
    }
}
