//! Error type shared by every stage of the pipeline.

use thiserror::Error;

/// Fatal conditions that abort a `notify-exec` run.
///
/// A target command that exits nonzero is not an error; it is reported
/// through the notification instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Required credentials are missing from the environment.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No command was supplied on the command line.
    #[error("no command provided to {program}")]
    InvalidInvocation {
        /// Name this tool was invoked as.
        program: String,
    },

    /// The command line could not be parsed.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// The target command could not be launched.
    #[error("failed to start `{command}`: {source}")]
    ProcessStart {
        /// Program that failed to launch.
        command: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// Output capture or the wait on the child failed after it started.
    #[error("failed to capture output of `{command}`: {message}")]
    Capture {
        /// Program whose output was being captured.
        command: String,
        /// What went wrong.
        message: String,
    },

    /// The notification service rejected or never received the message.
    #[error("failed to send notification: {0}")]
    Delivery(String),

    /// A cassette file could not be read, parsed, or written.
    #[error("cassette error: {0}")]
    Cassette(String),

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
