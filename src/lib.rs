//! Run a command, capture its output, and push a notification about it.
//!
//! The pipeline is strictly sequential: configuration is read once, the
//! command runs with its output mirrored and captured ([`runner`]), a
//! bounded notification is composed from the result ([`compose`]), and a
//! [`ports::Notifier`] delivers it.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod ports;
pub mod runner;

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;

pub use error::Error;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns the first fatal error: missing credentials, no command, a command
/// that cannot start, or a failed delivery.
pub fn run<I, T>(args: I) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(|| "notify-exec".to_string(), |name| name.to_string_lossy().into_owned());

    let cli = cli::Cli::try_parse_from(&args)
        .map_err(|err| Error::Arguments(err.to_string()))?;

    let config = config::Config::from_env()?;
    logging::init(config.debug);
    tracing::debug!(
        skip_send = config.skip_send,
        device = ?config.device,
        record = ?config.record_dir,
        replay = ?config.replay_path,
        "configuration loaded"
    );

    if cli.command.is_empty() {
        return Err(Error::InvalidInvocation { program });
    }

    commands::dispatch(&cli.command, &config)
}
