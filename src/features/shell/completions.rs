//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, elvish and PowerShell.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::HabitError;

const BIN_NAME: &str = "habitflow";

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, HabitError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).map_err(|e| HabitError::Parse(format!("UTF-8 error: {e}")))
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc or ~/.bash_profile:
source <(habitflow completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
habitflow completions zsh > ~/.zsh/completions/_habitflow
# Then add to ~/.zshrc:
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
habitflow completions fish > ~/.config/fish/completions/habitflow.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
habitflow completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish completions directory:
habitflow completions elvish > ~/.elvish/lib/habitflow.elv
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}
