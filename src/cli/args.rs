use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "habitflow")]
#[command(about = "Track daily habits, streaks and completion statistics")]
#[command(long_about = "habitflow - A habit tracker for the command line

Record which habits you completed each day and see your streaks,
completion rates, weekly progress and a calendar heatmap.

QUICK START:
  habitflow habit add \"Drink water\" --category health   Create a habit
  habitflow done 1                                      Mark habit 1 done today
  habitflow today                                       Today's checklist
  habitflow stats                                       Summary statistics

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  habitflow <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output, or 'json' for
    /// machine-readable output suitable for scripting. Defaults to the
    /// `general.default_output` config value.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory holding config.yaml and habitflow.db
    #[arg(long, env = "HABITFLOW_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage habits (list, show, add, edit, archive, restore, delete)
    ///
    /// # Examples
    ///
    ///   habitflow habit list
    ///   habitflow habit add "Read" --category learning --target 20 --unit pages
    ///   habitflow habit edit 3 --color "#10B981"
    ///   habitflow habit archive 3
    #[command(alias = "h")]
    Habit(HabitArgs),

    /// Mark a habit as done for a day
    ///
    /// Defaults to today. Marking the same day again keeps the higher count
    /// and only overwrites the optional fields you pass.
    ///
    /// # Examples
    ///
    ///   habitflow done 1
    ///   habitflow done 1 --date yesterday --mood good
    ///   habitflow done 2 --count 8 --notes "glasses of water"
    #[command(alias = "d")]
    Done(DoneArgs),

    /// Undo a habit's completion for a day
    ///
    /// # Examples
    ///
    ///   habitflow undo 1
    ///   habitflow undo 1 --date 2024-03-01
    Undo {
        /// Habit ID
        habit: i64,

        /// Day to undo (today, yesterday, "3 days ago", monday, 2024-03-01)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show today's checklist of active habits
    #[command(alias = "t")]
    Today,

    /// Show completion history, newest first
    ///
    /// # Examples
    ///
    ///   habitflow history
    ///   habitflow history --from "2 weeks ago" --habit 3
    History {
        /// First day to include
        #[arg(long)]
        from: Option<String>,

        /// Last day to include
        #[arg(long)]
        to: Option<String>,

        /// Only this habit
        #[arg(long)]
        habit: Option<i64>,
    },

    /// Show statistics
    ///
    /// Without a subcommand, shows the summary.
    Stats(StatsArgs),

    /// Generate shell completions
    ///
    /// Outputs completion script for the specified shell.
    ///
    /// Example: habitflow completions bash > ~/.bash_completion.d/habitflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },

    /// Show or initialise configuration
    Config(ConfigArgs),
}

/// Arguments for the habit command.
#[derive(Args)]
pub struct HabitArgs {
    #[command(subcommand)]
    pub command: HabitCommands,
}

/// Habit subcommands.
#[derive(Subcommand)]
pub enum HabitCommands {
    /// List habits, newest first
    #[command(alias = "ls")]
    List {
        /// Only habits in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Only active (true) or archived (false) habits
        #[arg(long)]
        active: Option<bool>,
    },

    /// Show a habit and its recent completions
    Show {
        /// Habit ID
        id: i64,
    },

    /// Add a new habit
    Add(AddHabitArgs),

    /// Edit a habit
    Edit(EditHabitArgs),

    /// Archive a habit so it no longer appears in today's checklist
    Archive {
        /// Habit ID
        id: i64,
    },

    /// Restore an archived habit
    Restore {
        /// Habit ID
        id: i64,
    },

    /// Delete a habit and all of its completions
    #[command(alias = "rm")]
    Delete {
        /// Habit ID
        id: i64,
    },
}

/// Arguments for adding a habit.
#[derive(Args)]
pub struct AddHabitArgs {
    /// Habit name
    pub name: String,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Category (health, fitness, productivity, learning, mindfulness, social, creative, other)
    #[arg(long, short = 'c', default_value = "other")]
    pub category: String,

    /// Hex color (#RGB or #RRGGBB)
    #[arg(long)]
    pub color: Option<String>,

    /// Icon shown next to the name
    #[arg(long)]
    pub icon: Option<String>,

    /// Frequency: daily, weekly:mon,wed,fri or custom:2024-01-01,2024-01-15
    #[arg(long, short = 'f', default_value = "daily")]
    pub frequency: String,

    /// Target count per day
    #[arg(long, default_value = "1")]
    pub target: u32,

    /// Unit for the target count
    #[arg(long)]
    pub unit: Option<String>,

    /// Reminder time as HH:MM
    #[arg(long)]
    pub reminder: Option<String>,

    /// Reminder message
    #[arg(long)]
    pub reminder_message: Option<String>,
}

/// Arguments for editing a habit.
#[derive(Args)]
pub struct EditHabitArgs {
    /// Habit ID
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// New hex color
    #[arg(long)]
    pub color: Option<String>,

    /// New icon
    #[arg(long)]
    pub icon: Option<String>,

    /// New frequency
    #[arg(long, short = 'f')]
    pub frequency: Option<String>,

    /// New target count
    #[arg(long)]
    pub target: Option<u32>,

    /// New unit
    #[arg(long)]
    pub unit: Option<String>,

    /// Reminder time as HH:MM (enables the reminder)
    #[arg(long, conflicts_with = "no_reminder")]
    pub reminder: Option<String>,

    /// Reminder message
    #[arg(long)]
    pub reminder_message: Option<String>,

    /// Turn the reminder off
    #[arg(long)]
    pub no_reminder: bool,
}

/// Arguments for marking a habit done.
#[derive(Args)]
pub struct DoneArgs {
    /// Habit ID
    pub habit: i64,

    /// Day to mark (today, yesterday, "3 days ago", monday, 2024-03-01)
    #[arg(long)]
    pub date: Option<String>,

    /// How many times it was done
    #[arg(long, short = 'n', default_value = "1")]
    pub count: u32,

    /// Notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mood (excellent, good, neutral, difficult, struggled)
    #[arg(long, short = 'm')]
    pub mood: Option<String>,

    /// Difficulty from 1 (easy) to 5 (hard)
    #[arg(long)]
    pub difficulty: Option<u8>,

    /// Minutes spent
    #[arg(long)]
    pub time_spent: Option<u32>,
}

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: Option<StatsCommands>,
}

/// Statistics subcommands.
#[derive(Subcommand)]
pub enum StatsCommands {
    /// Show a summary across all habits
    Summary {
        /// Window in days (default from config)
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },

    /// Show statistics for one habit
    Habit {
        /// Habit ID
        id: i64,

        /// Window in days (default from config)
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },

    /// Show seven days of progress
    ///
    /// Without --offset, the last seven days. With --offset, the
    /// Sunday-to-Saturday week shifted by that many weeks (0 = this week,
    /// -1 = last week).
    Weekly {
        /// Week offset
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<i64>,
    },

    /// Show a completion calendar heatmap
    Calendar {
        /// Days to cover (default from config)
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },

    /// Recompute every habit's cached streaks
    Refresh,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the data directory paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_output_default_none() {
        let cli = Cli::try_parse_from(["habitflow", "today"]).unwrap();
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Today));
    }

    #[test]
    fn test_cli_global_output() {
        let cli = Cli::try_parse_from(["habitflow", "today", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_cli_invalid_output() {
        assert!(Cli::try_parse_from(["habitflow", "-o", "xml", "today"]).is_err());
    }

    #[test]
    fn test_cli_home() {
        let cli = Cli::try_parse_from(["habitflow", "--home", "/tmp/hf", "today"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/hf")));
    }

    #[test]
    fn test_cli_habit_add() {
        let cli = Cli::try_parse_from([
            "habitflow", "habit", "add", "Read", "-c", "learning", "--target", "20", "--unit",
            "pages",
        ])
        .unwrap();
        if let Commands::Habit(args) = cli.command {
            if let HabitCommands::Add(add) = args.command {
                assert_eq!(add.name, "Read");
                assert_eq!(add.category, "learning");
                assert_eq!(add.target, 20);
                assert_eq!(add.unit.as_deref(), Some("pages"));
                assert_eq!(add.frequency, "daily");
            } else {
                panic!("Expected Add subcommand");
            }
        } else {
            panic!("Expected Habit command");
        }
    }

    #[test]
    fn test_cli_habit_list_alias() {
        let cli = Cli::try_parse_from(["habitflow", "h", "ls", "--active", "false"]).unwrap();
        if let Commands::Habit(args) = cli.command {
            assert!(matches!(
                args.command,
                HabitCommands::List {
                    category: None,
                    active: Some(false)
                }
            ));
        } else {
            panic!("Expected Habit command");
        }
    }

    #[test]
    fn test_cli_edit_reminder_conflict() {
        let result = Cli::try_parse_from([
            "habitflow",
            "habit",
            "edit",
            "1",
            "--reminder",
            "07:00",
            "--no-reminder",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_done() {
        let cli = Cli::try_parse_from([
            "habitflow", "done", "3", "--date", "yesterday", "-n", "2", "--mood", "good",
        ])
        .unwrap();
        if let Commands::Done(args) = cli.command {
            assert_eq!(args.habit, 3);
            assert_eq!(args.date.as_deref(), Some("yesterday"));
            assert_eq!(args.count, 2);
            assert_eq!(args.mood.as_deref(), Some("good"));
            assert!(args.difficulty.is_none());
        } else {
            panic!("Expected Done command");
        }
    }

    #[test]
    fn test_cli_done_requires_id() {
        assert!(Cli::try_parse_from(["habitflow", "done", "abc"]).is_err());
    }

    #[test]
    fn test_cli_stats_default() {
        let cli = Cli::try_parse_from(["habitflow", "stats"]).unwrap();
        if let Commands::Stats(args) = cli.command {
            assert!(args.command.is_none());
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_cli_stats_weekly_negative_offset() {
        let cli = Cli::try_parse_from(["habitflow", "stats", "weekly", "--offset", "-1"]).unwrap();
        if let Commands::Stats(args) = cli.command {
            assert!(matches!(
                args.command,
                Some(StatsCommands::Weekly { offset: Some(-1) })
            ));
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["habitflow", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: Shell::Zsh,
                install: false
            }
        ));
    }
}
