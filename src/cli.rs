//! CLI argument definitions.

use clap::Parser;

/// Everything after the program name is the command to run.
///
/// Built-in help and version flags are disabled so that arguments such as
/// `--help` reach the wrapped command untouched.
#[derive(Debug, Parser)]
#[command(
    name = "notify-exec",
    about = "Run a command and push a notification when it finishes",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Program to run followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub command: Vec<String>,
}
