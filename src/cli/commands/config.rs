//! Configuration commands.

use serde_json::json;
use tracing::info;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::HabitError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// These run without opening the database.
///
/// # Errors
///
/// Returns an error if the config file cannot be written or serialized.
pub fn config(
    paths: &Paths,
    current: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, HabitError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(current),
            OutputFormat::Pretty => current.to_yaml(),
        },
        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(HabitError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            info!(path = %paths.config_file.display(), "wrote default config");

            match format {
                OutputFormat::Json => to_json(&json!({
                    "written": paths.config_file.display().to_string(),
                })),
                OutputFormat::Pretty => {
                    Ok(format!("Wrote {}", paths.config_file.display()))
                },
            }
        },
        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&json!({
                "root": paths.root.display().to_string(),
                "config": paths.config_file.display().to_string(),
                "database": paths.database.display().to_string(),
            })),
            OutputFormat::Pretty => Ok(format!(
                "root:     {}\nconfig:   {}\ndatabase: {}",
                paths.root.display(),
                paths.config_file.display(),
                paths.database.display()
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_defaults_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("hf"));
        let current = Config::default();

        let output = config(
            &paths,
            &current,
            ConfigCommands::Init { force: false },
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(output.starts_with("Wrote"));
        assert!(paths.config_file.exists());

        assert!(matches!(
            config(&paths, &current, ConfigCommands::Init { force: false }, OutputFormat::Pretty),
            Err(HabitError::Config(_))
        ));
        assert!(config(&paths, &current, ConfigCommands::Init { force: true }, OutputFormat::Pretty).is_ok());
    }

    #[test]
    fn test_show_json() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        let output = config(&paths, &Config::default(), ConfigCommands::Show, OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["stats"]["calendar_days"], 90);
        assert_eq!(value["general"]["default_output"], "pretty");
    }

    #[test]
    fn test_path_pretty() {
        let paths = Paths::with_root(std::path::PathBuf::from("/tmp/hf-test"));
        let output = config(&paths, &Config::default(), ConfigCommands::Path, OutputFormat::Pretty)
            .unwrap();
        assert!(output.contains("/tmp/hf-test/habitflow.db"));
    }
}
