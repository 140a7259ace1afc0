use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use habitflow::cli::args::{Cli, Commands};
use habitflow::cli::commands::{self, Context};
use habitflow::config::{Config, Paths};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = match cli.home {
        Some(root) => Paths::with_root(root),
        None => Paths::new()?,
    };
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    let open = || Context::open(&paths, config.clone());

    let output = match cli.command {
        Commands::Habit(args) => commands::habit(&open()?, args.command, format)?,
        Commands::Done(args) => commands::done(&mut open()?, args, format)?,
        Commands::Undo { habit, date } => {
            commands::undo(&mut open()?, habit, date.as_deref(), format)?
        },
        Commands::Today => commands::today(&open()?, format)?,
        Commands::History { from, to, habit } => {
            commands::history(&open()?, from.as_deref(), to.as_deref(), habit, format)?
        },
        Commands::Stats(args) => commands::stats(&open()?, args.command, format)?,
        Commands::Completions { shell, install } => commands::completions(shell, install)?,
        Commands::Config(args) => commands::config(&paths, &config, args.command, format)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
